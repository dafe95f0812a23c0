use clap::Parser;
use fcc_builder::{
    logging, BuildCli, BuilderError, OutputFormatter, OutputMode, SolutionBuilder,
    UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = BuildCli::parse();
    logging::init_logging_stderr(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let builder = match SolutionBuilder::from_cli(&cli) {
        Ok(builder) => builder,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    let source = cli.source_folder.as_deref();
    let destination = cli.destination().map(|p| p.as_path());

    match builder.batch_process(source, destination) {
        Ok(summary) => {
            if summary.has_failures() {
                2 // Finished, but some documents failed
            } else {
                0
            }
        }
        Err(e) => {
            builder.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &BuildCli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "fcc-builder.toml".to_string());

    match SolutionBuilder::generate_sample_config(&config_path) {
        Ok(()) => {
            if !cli.quiet {
                println!("Generated sample configuration file: {}", config_path);
                println!("\nTo use this configuration:");
                println!("  fcc-build <source_folder> --config {}", config_path);
                println!("\nfcc-build also picks up fcc-builder.toml from the current directory.");
            }
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(cli: &BuildCli, error: &BuilderError) {
    let mode: OutputMode = cli.output_format.into();
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}
