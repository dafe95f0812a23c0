use anyhow::Context;
use clap::Parser;
use fcc_builder::{logging, BuilderError, OutputFormatter, OutputMode, SortCli, Sorter};
use std::process;

fn main() {
    let cli = SortCli::parse();
    logging::init_logging_stderr(cli.verbose, cli.quiet);

    let mode: OutputMode = cli.output_format.into();
    let formatter = OutputFormatter::new(mode, cli.verbosity_level(), cli.quiet);

    let exit_code = match run(&cli, &formatter) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<BuilderError>() {
                Some(error) => formatter.print_user_friendly_error(error),
                None => formatter.error(&format!("{:#}", e)),
            }
            1
        }
    };

    process::exit(exit_code);
}

fn run(cli: &SortCli, formatter: &OutputFormatter) -> anyhow::Result<i32> {
    let config = cli.load_config()?;
    let root = std::env::current_dir().context("Could not determine the current directory")?;

    if cli.dry_run {
        formatter.info("DRY RUN MODE - nothing will be moved");
    }

    let report = Sorter::new(&root, config.sort)
        .with_dry_run(cli.dry_run)
        .run()?;

    formatter.print_sort_report(&report);

    // Folders left in place because their destination already exists
    Ok(if report.conflicts.is_empty() { 0 } else { 2 })
}
