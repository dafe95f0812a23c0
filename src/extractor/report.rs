use crate::extractor::file_extractor::DocumentOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub file_name: String,
    pub outcome: DocumentOutcome,
    /// Where the original was moved, when it was archived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_to: Option<PathBuf>,
}

/// Running tally of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// True when the source folder held no `.txt` files at all
    pub no_solutions: bool,
    pub entries: Vec<EntryReport>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    #[serde(skip, default = "Instant::now")]
    start_time: Instant,
}

impl BatchSummary {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            processed: 0,
            skipped: 0,
            failed: 0,
            no_solutions: false,
            entries: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, file_name: String, outcome: DocumentOutcome) -> &mut EntryReport {
        match outcome {
            DocumentOutcome::Processed { .. } => self.processed += 1,
            DocumentOutcome::Skipped { .. } => self.skipped += 1,
            DocumentOutcome::Failed { .. } => self.failed += 1,
        }

        self.entries.push(EntryReport {
            file_name,
            outcome,
            archived_to: None,
        });

        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn record_unsupported(&mut self, file_name: String, is_dir: bool) {
        self.record(
            file_name,
            DocumentOutcome::Skipped {
                reason: format!("unsupported {}", unsupported_kind(is_dir)),
            },
        );
    }

    pub fn finish(&mut self) {
        self.duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn tally_line(&self) -> String {
        format!(
            "FINISHED - {} Processed, {} Skipped, {} Failed",
            self.processed, self.skipped, self.failed
        )
    }
}

pub(crate) fn unsupported_kind(is_dir: bool) -> &'static str {
    if is_dir {
        "folder"
    } else {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_outcomes() {
        let mut summary = BatchSummary::new(PathBuf::from("in"), PathBuf::from("out"));

        summary.record(
            "a.txt".to_string(),
            DocumentOutcome::Processed {
                output_dir: PathBuf::from("out/a"),
                sections: 2,
            },
        );
        summary.record(
            "b.txt".to_string(),
            DocumentOutcome::Failed {
                reason: "boom".to_string(),
            },
        );
        summary.record_unsupported("image.png".to_string(), false);

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.entries.len(), 3);
        assert!(summary.has_failures());
        assert_eq!(
            summary.tally_line(),
            "FINISHED - 1 Processed, 1 Skipped, 1 Failed"
        );
    }

    #[test]
    fn test_unsupported_reason_names_entry_kind() {
        let mut summary = BatchSummary::new(PathBuf::from("in"), PathBuf::from("in"));
        summary.record_unsupported("Originals".to_string(), true);
        summary.record_unsupported("cover.jpg".to_string(), false);

        assert_eq!(summary.skipped, 2);
        assert_eq!(
            summary.entries[0].outcome,
            DocumentOutcome::Skipped {
                reason: "unsupported folder".to_string()
            }
        );
        assert_eq!(
            summary.entries[1].outcome,
            DocumentOutcome::Skipped {
                reason: "unsupported file".to_string()
            }
        );
    }

    #[test]
    fn test_record_returns_entry_for_annotation() {
        let mut summary = BatchSummary::new(PathBuf::from("in"), PathBuf::from("in"));
        let entry = summary.record(
            "a.txt".to_string(),
            DocumentOutcome::Skipped {
                reason: "not a solution".to_string(),
            },
        );
        entry.archived_to = Some(PathBuf::from("in/Originals/a.txt"));

        assert_eq!(
            summary.entries[0].archived_to.as_deref(),
            Some(std::path::Path::new("in/Originals/a.txt"))
        );
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut summary = BatchSummary::new(PathBuf::from("in"), PathBuf::from("out"));
        summary.record_unsupported("notes.md".to_string(), false);
        summary.finish();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["entries"][0]["outcome"]["status"], "skipped");
        assert!(json.get("start_time").is_none());
    }
}
