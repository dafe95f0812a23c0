use crate::error::{BuilderError, UserFriendlyError};
use crate::extractor::report::unsupported_kind;
use crate::extractor::{BatchSummary, DocumentOutcome, ResourceEvent};
use crate::sorter::SortReport;
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "+ ");
static CROSS: Emoji = Emoji("❌ ", "x ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static INBOX: Emoji = Emoji("📥 ", "< ");
static SKIP: Emoji = Emoji("⏭️  ", "- ");
static BLOCKED: Emoji = Emoji("🚫 ", "- ");
static FINISH: Emoji = Emoji("🏁 ", "# ");
static FOLDER: Emoji = Emoji("📁 ", "> ");
static PAGE: Emoji = Emoji("📄 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &BuilderError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Batch events
    pub fn resource_event(&self, event: &ResourceEvent) {
        match event {
            ResourceEvent::Saved { url, filename } => {
                if !self.should_show_message(0) {
                    return;
                }
                match self.mode {
                    OutputMode::Human => {
                        println!("{}Saved resource: [{}] from {}", INBOX, filename, url)
                    }
                    OutputMode::Json => self.print_json_object(&serde_json::json!({
                        "type": "resource",
                        "status": "saved",
                        "url": url,
                        "file": filename
                    })),
                    OutputMode::Plain => println!("SAVED: {} <- {}", filename, url),
                }
            }
            ResourceEvent::Failed { url, reason } => {
                self.warning(&format!("Failed to download {}: {}", url, reason));
            }
        }
    }

    pub fn unsupported_entry(&self, file_name: &str, is_dir: bool) {
        if !self.should_show_message(0) {
            return;
        }
        let kind = unsupported_kind(is_dir);
        match self.mode {
            OutputMode::Human => println!("{}Skipping unsupported {}: {}", BLOCKED, kind, file_name),
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "document",
                "file": file_name,
                "status": "skipped",
                "reason": format!("unsupported {}", kind)
            })),
            OutputMode::Plain => println!("SKIPPED: {} (unsupported {})", file_name, kind),
        }
    }

    pub fn no_solutions(&self, source: &Path) {
        let message = format!("No *.txt files found in {}", source.display());
        if !self.should_show_message(0) {
            return;
        }
        match self.mode {
            OutputMode::Human => println!("{}{}", BLOCKED, message),
            OutputMode::Json => self.print_json_message("warning", &message),
            OutputMode::Plain => println!("WARNING: {}", message),
        }
    }

    /// One line per input document, matching its outcome.
    pub fn document_outcome(&self, file_name: &str, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Processed { output_dir, .. } => {
                let shown = display_relative(output_dir);
                match self.mode {
                    OutputMode::Human => self.success(&format!("Processed: {} → {}", file_name, shown)),
                    OutputMode::Json => self.print_document_json(file_name, outcome),
                    OutputMode::Plain => {
                        if self.should_show_message(0) {
                            println!("PROCESSED: {} -> {}", file_name, shown);
                        }
                    }
                }
            }
            DocumentOutcome::Skipped { reason } => {
                if !self.should_show_message(0) {
                    return;
                }
                match self.mode {
                    OutputMode::Human => {
                        println!("{}{} {} -- skipping...", SKIP, file_name, reason)
                    }
                    OutputMode::Json => self.print_document_json(file_name, outcome),
                    OutputMode::Plain => println!("SKIPPED: {} ({})", file_name, reason),
                }
            }
            DocumentOutcome::Failed { reason } => match self.mode {
                OutputMode::Json => self.print_document_json(file_name, outcome),
                _ => self.error(&format!("{} failed due to error: {}", file_name, reason)),
            },
        }
    }

    // Summary and reporting
    pub fn print_batch_summary(&self, summary: &BatchSummary) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if summary.no_solutions || self.quiet => {}
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", FINISH, style(summary.tally_line()).bold());
                } else {
                    println!("{}{}", FINISH, summary.tally_line());
                }
                if self.verbose_level >= 1 {
                    println!("  Time taken: {}", format_duration(summary.duration));
                }
            }
            OutputMode::Plain => {
                println!("{}", summary.tally_line());
                if self.verbose_level >= 1 {
                    println!("Duration: {:?}", summary.duration);
                }
            }
        }
    }

    pub fn print_sort_report(&self, report: &SortReport) {
        if self.mode == OutputMode::Json {
            let json_output =
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json_output);
            return;
        }

        if self.quiet {
            return;
        }

        let verb = if report.dry_run { "Would move" } else { "Moved" };
        let wrap_verb = if report.dry_run { "Would wrap" } else { "Wrapped" };

        for wrapped in &report.wrapped {
            let file = display_name(&wrapped.file);
            let target = display_relative(
                wrapped
                    .destination
                    .parent()
                    .unwrap_or(wrapped.destination.as_path()),
            );
            match self.mode {
                OutputMode::Human => println!("{}{} file: {} → {}/", PAGE, wrap_verb, file, target),
                _ => println!("WRAPPED: {} -> {}/", file, target),
            }
        }

        for folder_move in &report.moved {
            let folder = display_name(&folder_move.folder);
            let bucket = display_relative(
                folder_move
                    .destination
                    .parent()
                    .unwrap_or(folder_move.destination.as_path()),
            );
            match self.mode {
                OutputMode::Human => {
                    println!("{}{} folder: {} → {}/", FOLDER, verb, folder, bucket)
                }
                _ => println!("MOVED: {} -> {}/ ({})", folder, bucket, folder_move.technology),
            }
        }

        for conflict in &report.conflicts {
            self.warning(&format!(
                "Left {} in place: {}",
                display_name(&conflict.path),
                conflict.reason
            ));
        }

        for folder in &report.unclassified {
            self.info(&format!("Not classified: {}", display_name(folder)));
        }

        if !report.has_changes() {
            self.info("Nothing to sort");
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, message),
                _ => println!("{}{}", emoji, message),
            }
        }
    }

    fn print_document_json(&self, file_name: &str, outcome: &DocumentOutcome) {
        let mut object = serde_json::json!({
            "type": "document",
            "file": file_name,
        });
        if let (Some(map), Ok(serde_json::Value::Object(detail))) =
            (object.as_object_mut(), serde_json::to_value(outcome))
        {
            map.extend(detail);
        }
        self.print_json_object(&object);
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

/// Path relative to the working directory when it lies below it.
fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

// Progress-aware output wrapper
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn warning(&self, message: &str) {
        self.suspend_and_print(|f| f.warning(message));
    }

    pub fn resource_event(&self, event: &ResourceEvent) {
        self.suspend_and_print(|f| f.resource_event(event));
    }

    pub fn unsupported_entry(&self, file_name: &str, is_dir: bool) {
        self.suspend_and_print(|f| f.unsupported_entry(file_name, is_dir));
    }

    pub fn document_outcome(&self, file_name: &str, outcome: &DocumentOutcome) {
        self.suspend_and_print(|f| f.document_outcome(file_name, outcome));
    }
}
