use crate::error::{BuilderError, Result};
use crate::extractor::output_manager::OutputFolder;
use crate::extractor::resources::Localizer;
use crate::extractor::sections::extract_sections;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Processed { output_dir: PathBuf, sections: usize },
    Skipped { reason: String },
    Failed { reason: String },
}

impl DocumentOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, DocumentOutcome::Processed { .. })
    }

}

/// Turns one solution export into a folder of section files.
pub struct DocumentProcessor<'a> {
    localizer: &'a Localizer<'a>,
}

impl<'a> DocumentProcessor<'a> {
    pub fn new(localizer: &'a Localizer<'a>) -> Self {
        Self { localizer }
    }

    /// Never returns an error: every failure is folded into
    /// [`DocumentOutcome::Failed`] after the partial output is removed.
    pub fn process_document(&self, path: &Path, dest_root: &Path) -> DocumentOutcome {
        let content = match read_document(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read document");
                return DocumentOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let sections = extract_sections(&content);
        if sections.is_empty() {
            return DocumentOutcome::Skipped {
                reason: "does not appear to be a freeCodeCamp solution".to_string(),
            };
        }

        let base_name = document_base_name(path);
        let output = OutputFolder::new(dest_root, &base_name);

        match self.build_output(&output, sections) {
            Ok(count) => DocumentOutcome::Processed {
                output_dir: output.path().to_path_buf(),
                sections: count,
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document failed, discarding output");
                if let Err(cleanup) = output.cleanup_on_error() {
                    tracing::warn!(
                        folder = %output.path().display(),
                        error = %cleanup,
                        "could not remove partial output"
                    );
                }
                DocumentOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn build_output(
        &self,
        output: &OutputFolder,
        sections: std::collections::BTreeMap<String, String>,
    ) -> Result<usize> {
        output.initialize()?;

        let localized = self.localizer.localize_sections(sections, output.path())?;

        for (name, content) in &localized {
            let written = output.write_section(name, content)?;
            tracing::debug!(file = %written.display(), "wrote section");
        }

        Ok(localized.len())
    }
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| BuilderError::Encoding {
        path: path.display().to_string(),
    })
}

/// File name without its extension, used as the output folder name.
pub fn document_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed_solution".to_string())
}
