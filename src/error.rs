use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Resource download failed: {url}")]
    ResourceDownload { url: String },

    #[error("HTTP request failed for {url}: {message}")]
    Http { url: String, message: String },

    #[error("File is not valid UTF-8: {path}")]
    Encoding { path: String },

    #[error("Invalid resource pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for BuilderError {
    fn user_message(&self) -> String {
        match self {
            BuilderError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            BuilderError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            BuilderError::ResourceDownload { url } => {
                format!("Could not download external resource: {}", url)
            }
            BuilderError::Http { url, message } => {
                format!("Request to {} failed: {}", url, message)
            }
            BuilderError::Encoding { path } => {
                format!("{} is not a UTF-8 text file", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            BuilderError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are valid.".to_string()
            ),
            BuilderError::InvalidPath { .. } => Some(
                "Make sure the source folder exists and section names are plain file names.".to_string()
            ),
            BuilderError::ResourceDownload { .. } | BuilderError::Http { .. } => Some(
                "Check your internet connection, or run with --offline to keep external URLs unchanged.".to_string()
            ),
            BuilderError::Encoding { .. } => Some(
                "Re-export the solution from freeCodeCamp and save it with UTF-8 encoding.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for BuilderError {
    fn from(error: toml::de::Error) -> Self {
        BuilderError::Config {
            message: error.to_string(),
        }
    }
}

impl From<walkdir::Error> for BuilderError {
    fn from(error: walkdir::Error) -> Self {
        match error.into_io_error() {
            Some(io) => BuilderError::Io(io),
            None => BuilderError::InvalidPath {
                path: "filesystem loop detected".to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;
