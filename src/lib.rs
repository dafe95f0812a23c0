pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod scanner;
pub mod sorter;
pub mod ui;

// Public API re-exports
pub use cli::{BuildCli, OutputFormat, SortCli};
pub use config::{BuildConfig, CliOverrides, Config, DownloadConfig, SortConfig};
pub use error::{BuilderError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    extract_sections, find_resource_urls, BatchSummary, DocumentOutcome, DocumentProcessor,
    Localizer, OriginalsArchive, ResourceEvent,
};
pub use fetcher::{FetchedResource, HttpFetcher, ResourceFetcher};
pub use scanner::{FileFilter, SourceScanner};
pub use sorter::{FolderClassifier, SortPlan, SortReport, Sorter, Technology};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use crate::ui::ProgressAwareOutput;

/// Main library interface for building solution folders
pub struct SolutionBuilder {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl SolutionBuilder {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &BuildCli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_format.into(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Processes every solution export in `source`.
    ///
    /// `source` defaults to the working directory and `destination` to
    /// `source`. Only a missing or unreadable source folder is an error;
    /// per-document problems end up in the returned summary.
    pub fn batch_process(
        &self,
        source: Option<&Path>,
        destination: Option<&Path>,
    ) -> Result<BatchSummary> {
        let source = match source {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source.clone());

        let fetcher = HttpFetcher::new(
            self.config.download_timeout_duration(),
            &self.config.download.user_agent,
        )?;

        self.batch_process_with(&fetcher, &source, &destination)
    }

    /// Same as [`batch_process`](Self::batch_process) with an explicit
    /// resource fetcher.
    pub fn batch_process_with(
        &self,
        fetcher: &dyn ResourceFetcher,
        source: &Path,
        destination: &Path,
    ) -> Result<BatchSummary> {
        let scanner = SourceScanner::new(FileFilter::new(&self.config.build));
        let listing = scanner.scan_directory(source)?;

        self.output_formatter.start_operation(&format!(
            "Building solutions from {}",
            source.display()
        ));

        let mut summary = BatchSummary::new(source.to_path_buf(), destination.to_path_buf());
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        for entry in &listing.unsupported {
            output.unsupported_entry(&entry.file_name, entry.is_dir);
            summary.record_unsupported(entry.file_name.clone(), entry.is_dir);
        }

        if listing.solutions.is_empty() {
            self.output_formatter.no_solutions(source);
            summary.no_solutions = true;
            summary.finish();
            self.output_formatter.print_batch_summary(&summary);
            return Ok(summary);
        }

        let on_event = |event: &ResourceEvent| output.resource_event(event);
        let localizer = Localizer::new(fetcher)?
            .with_offline(self.config.build.offline)
            .with_events(&on_event);
        let processor = DocumentProcessor::new(&localizer);

        let archive = if self.config.build.move_originals && same_location(source, destination) {
            Some(OriginalsArchive::new(
                source,
                &self.config.build.originals_folder,
            ))
        } else {
            None
        };

        let progress = self
            .progress_manager
            .create_document_progress(listing.solutions.len() as u64);

        for (index, entry) in listing.solutions.iter().enumerate() {
            ui::progress::update_document_progress(&progress, index as u64, &entry.file_name);

            let outcome = processor.process_document(&entry.path, destination);
            output.document_outcome(&entry.file_name, &outcome);

            let processed = outcome.is_processed();
            let report = summary.record(entry.file_name.clone(), outcome);

            if let (true, Some(archive)) = (processed, &archive) {
                match archive.archive(&entry.path) {
                    Ok(moved_to) => report.archived_to = Some(moved_to),
                    Err(e) => output.warning(&format!(
                        "Could not move {} to {}: {}",
                        entry.file_name,
                        archive.directory().display(),
                        e
                    )),
                }
            }
        }

        progress.set_position(listing.solutions.len() as u64);
        ui::progress::finish_progress_with_summary(
            &progress,
            &format!("Built {} of {} documents", summary.processed, listing.solutions.len()),
            summary.elapsed(),
        );
        self.progress_manager.clear();

        summary.finish();
        self.output_formatter.print_batch_summary(&summary);

        Ok(summary)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &BuilderError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Compares resolved paths when both exist, literal paths otherwise.
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DEMO: &str = "** start of index.html **\n<p>hi</p>\n** end of index.html **\n";

    struct StaticFetcher;

    impl ResourceFetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<FetchedResource> {
            if url.contains("missing") {
                return Err(BuilderError::Http {
                    url: url.to_string(),
                    message: "server responded with 404 Not Found".to_string(),
                });
            }
            Ok(FetchedResource {
                body: b"/* css */".to_vec(),
                content_type: Some("text/css".to_string()),
            })
        }
    }

    fn quiet_builder(config: Config) -> SolutionBuilder {
        SolutionBuilder::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_batch_in_place_archives_originals() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("demo.txt"), DEMO).unwrap();
        fs::write(root.join("notes.txt"), "nothing to see").unwrap();
        fs::write(root.join("photo.png"), "png").unwrap();

        let summary = quiet_builder(Config::default())
            .batch_process_with(&StaticFetcher, root, root)
            .unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            fs::read_to_string(root.join("demo").join("index.html")).unwrap(),
            "<p>hi</p>"
        );

        // Only processed documents are archived
        assert!(root.join("Originals").join("demo.txt").exists());
        assert!(!root.join("demo.txt").exists());
        assert!(root.join("notes.txt").exists());
    }

    #[test]
    fn test_separate_destination_keeps_originals() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("demo.txt"), DEMO).unwrap();

        let summary = quiet_builder(Config::default())
            .batch_process_with(&StaticFetcher, source.path(), dest.path())
            .unwrap();

        assert_eq!(summary.processed, 1);
        assert!(dest.path().join("demo").join("index.html").exists());
        assert!(source.path().join("demo.txt").exists());
        assert!(!source.path().join("Originals").exists());
    }

    #[test]
    fn test_no_move_keeps_originals_in_place() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("demo.txt"), DEMO).unwrap();

        let mut config = Config::default();
        config.merge_with_cli_args(&CliOverrides::new().with_no_move(true));

        let summary = quiet_builder(config)
            .batch_process_with(&StaticFetcher, temp_dir.path(), temp_dir.path())
            .unwrap();

        assert_eq!(summary.processed, 1);
        assert!(summary.entries[0].archived_to.is_none());
        assert!(temp_dir.path().join("demo.txt").exists());
    }

    #[test]
    fn test_failed_document_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("a_broken.txt"),
            "** start of index.html **\n<img src=\"https://cdn.example/missing.png\">\n** end of index.html **",
        )
        .unwrap();
        fs::write(root.join("b_demo.txt"), DEMO).unwrap();

        let summary = quiet_builder(Config::default())
            .batch_process_with(&StaticFetcher, root, root)
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 1);
        assert!(summary.has_failures());
        assert!(!root.join("a_broken").exists());
        assert!(root.join("a_broken.txt").exists());
        assert!(root.join("Originals").join("b_demo.txt").exists());
    }

    #[test]
    fn test_source_without_solutions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("readme.md"), "#").unwrap();

        let summary = quiet_builder(Config::default())
            .batch_process_with(&StaticFetcher, temp_dir.path(), temp_dir.path())
            .unwrap();

        assert!(summary.no_solutions);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed, 0);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let result = quiet_builder(Config::default()).batch_process_with(
            &StaticFetcher,
            &missing,
            &missing,
        );

        assert!(matches!(result, Err(BuilderError::InvalidPath { .. })));
    }

    #[test]
    fn test_same_location() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("a")).unwrap();

        assert!(same_location(&root.join("a"), &root.join("a").join("..").join("a")));
        assert!(!same_location(&root.join("a"), root));
        assert!(same_location(Path::new("nope/x"), Path::new("nope/x")));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("fcc-builder.toml");

        SolutionBuilder::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[build]"));
        assert!(content.contains("[sort]"));
        assert!(Config::load_from_file(&config_path).is_ok());
    }
}
