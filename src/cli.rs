use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fcc-build")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build project folders from freeCodeCamp lab solution exports")]
#[command(
    long_about = "fcc-build turns the .txt solution exports downloaded from freeCodeCamp.org \
                  into project folders, one file per section. External stylesheets, images \
                  and scripts are downloaded next to the sections and referenced locally."
)]
#[command(before_help = "📘 FreeCodeCamp Solution Builder")]
#[command(after_help = "EXAMPLES:\n  \
    fcc-build\n  \
    fcc-build ~/Downloads/fcc\n  \
    fcc-build ~/Downloads/fcc ~/projects/fcc --offline\n  \
    fcc-build exports --no-move --output-format json")]
pub struct BuildCli {
    /// Folder containing .txt files exported from freeCodeCamp (defaults to the current directory)
    pub source_folder: Option<PathBuf>,

    /// Folder in which to create output folders (defaults to source_folder)
    pub destination_folder: Option<PathBuf>,

    /// Keep the original .txt files in place instead of moving them to 'Originals'
    #[arg(long, help = "Do not move processed *.txt files to the 'Originals' folder")]
    pub no_move: bool,

    /// Leave external URLs unchanged
    #[arg(long, help = "Skip downloading external resources and leave URLs unchanged")]
    pub offline: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Resource download timeout in seconds
    #[arg(long, help = "Timeout for each resource download (seconds)")]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Write a sample fcc-builder.toml and exit")]
    pub generate_config: bool,
}

#[derive(Parser, Debug)]
#[command(name = "fcc-sort")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sort built project folders into JavaScript, CSS and HTML buckets")]
#[command(
    long_about = "fcc-sort works on the current directory. Loose .html files are wrapped \
                  into their own folder under HTML/, then every other folder is moved into \
                  the bucket matching the files it contains (.js before .css before .html)."
)]
pub struct SortCli {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be moved without moving anything)
    #[arg(long, help = "Show what would be moved without touching the filesystem")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl BuildCli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_no_move(self.no_move)
            .with_offline(self.offline)
            .with_timeout(self.timeout)
    }

    /// Destination falls back to the source folder.
    pub fn destination(&self) -> Option<&PathBuf> {
        self.destination_folder
            .as_ref()
            .or(self.source_folder.as_ref())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

impl SortCli {
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load_with_defaults(self.config.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_positional_folders() {
        let cli = BuildCli::try_parse_from(["fcc-build", "in", "out", "--offline"]).unwrap();
        assert_eq!(cli.source_folder.as_deref(), Some(Path::new("in")));
        assert_eq!(cli.destination().map(|p| p.as_path()), Some(Path::new("out")));
        assert!(cli.offline);
        assert!(!cli.no_move);
    }

    #[test]
    fn test_destination_defaults_to_source() {
        let cli = BuildCli::try_parse_from(["fcc-build", "exports"]).unwrap();
        assert_eq!(cli.destination().map(|p| p.as_path()), Some(Path::new("exports")));

        let cli = BuildCli::try_parse_from(["fcc-build"]).unwrap();
        assert!(cli.source_folder.is_none());
        assert!(cli.destination().is_none());
    }

    #[test]
    fn test_cli_overrides_reach_config() {
        let cli =
            BuildCli::try_parse_from(["fcc-build", "--no-move", "--timeout", "3"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert!(overrides.no_move);
        assert!(!overrides.offline);
        assert_eq!(overrides.timeout, Some(3));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(BuildCli::try_parse_from(["fcc-build", "-q", "-v"]).is_err());
        assert!(SortCli::try_parse_from(["fcc-sort", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_sort_cli_takes_no_positionals() {
        assert!(SortCli::try_parse_from(["fcc-sort", "somewhere"]).is_err());

        let cli = SortCli::try_parse_from(["fcc-sort", "--dry-run", "-vv"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_output_format_maps_to_mode() {
        assert_eq!(OutputMode::from(OutputFormat::Json), OutputMode::Json);
        assert_eq!(OutputMode::from(OutputFormat::Plain), OutputMode::Plain);
    }
}
