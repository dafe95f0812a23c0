use crate::config::BuildConfig;
use std::path::Path;

/// Decides which entries of the source folder are solution exports.
pub struct FileFilter {
    input_extension: String,
}

impl FileFilter {
    pub fn new(config: &BuildConfig) -> Self {
        Self::with_extension(&config.input_extension)
    }

    pub fn with_extension(extension: &str) -> Self {
        Self {
            input_extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    /// Extension match is case-insensitive; the entry kind is not checked.
    pub fn is_solution_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.to_lowercase() == self.input_extension)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&BuildConfig::default())
    }
}
