use crate::error::{BuilderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub download: DownloadConfig,
    pub sort: SortConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    pub move_originals: bool,
    pub offline: bool,
    pub originals_folder: String,
    pub input_extension: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Per-request timeout in seconds
    pub timeout: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SortConfig {
    pub javascript_bucket: String,
    pub css_bucket: String,
    pub html_bucket: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            move_originals: true,
            offline: false,
            originals_folder: "Originals".to_string(),
            input_extension: "txt".to_string(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            user_agent: format!("fcc-builder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            javascript_bucket: "JavaScript".to_string(),
            css_bucket: "CSS".to_string(),
            html_bucket: "HTML".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BuilderError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BuilderError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| BuilderError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["fcc-builder.toml", ".fcc-builder.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if cli_args.no_move {
            self.build.move_originals = false;
        }

        if cli_args.offline {
            self.build.offline = true;
        }

        if let Some(timeout) = cli_args.timeout {
            self.download.timeout = timeout;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| BuilderError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| BuilderError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.download.timeout == 0 {
            return Err(BuilderError::Config {
                message: "Download timeout must be greater than 0".to_string(),
            });
        }

        if self.build.input_extension.trim().is_empty() {
            return Err(BuilderError::Config {
                message: "Input extension must not be empty".to_string(),
            });
        }

        let folders = [
            ("originals_folder", &self.build.originals_folder),
            ("javascript_bucket", &self.sort.javascript_bucket),
            ("css_bucket", &self.sort.css_bucket),
            ("html_bucket", &self.sort.html_bucket),
        ];

        for (key, value) in folders {
            if value.trim().is_empty() || value.contains(|c: char| c == '/' || c == '\\') {
                return Err(BuilderError::Config {
                    message: format!("{} must be a plain folder name, got {:?}", key, value),
                });
            }
        }

        Ok(())
    }

    pub fn download_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.download.timeout)
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub no_move: bool,
    pub offline: bool,
    pub timeout: Option<u64>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_no_move(mut self, no_move: bool) -> Self {
        self.no_move = no_move;
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.build.move_originals);
        assert!(!config.build.offline);
        assert_eq!(config.build.originals_folder, "Originals");
        assert_eq!(config.download.timeout, 10);
        assert_eq!(config.sort.javascript_bucket, "JavaScript");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.download.timeout = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sort.css_bucket = "nested/CSS".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.download.timeout = 42;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.download.timeout, 42);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[build]\noffline = true\n").unwrap();
        assert!(config.build.offline);
        assert!(config.build.move_originals);
        assert_eq!(config.sort.html_bucket, "HTML");
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_no_move(true)
            .with_offline(true)
            .with_timeout(Some(30));

        config.merge_with_cli_args(&overrides);

        assert!(!config.build.move_originals);
        assert!(config.build.offline);
        assert_eq!(config.download_timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_saved_defaults_have_every_section() {
        let temp_file = NamedTempFile::new().unwrap();
        Config::default().save_to_file(temp_file.path()).unwrap();

        let sample = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(sample.contains("[build]"));
        assert!(sample.contains("[download]"));
        assert!(sample.contains("[sort]"));
    }
}
