use crate::config::SortConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    JavaScript,
    Css,
    Html,
}

impl Technology {
    /// Classification order: the first technology with a matching file wins.
    pub const PRIORITY: [Technology; 3] = [Technology::JavaScript, Technology::Css, Technology::Html];

    /// Signal extension, compared case-sensitively.
    pub fn extension(&self) -> &'static str {
        match self {
            Technology::JavaScript => "js",
            Technology::Css => "css",
            Technology::Html => "html",
        }
    }

    pub fn bucket_name<'a>(&self, config: &'a SortConfig) -> &'a str {
        match self {
            Technology::JavaScript => &config.javascript_bucket,
            Technology::Css => &config.css_bucket,
            Technology::Html => &config.html_bucket,
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::JavaScript => "JavaScript",
            Technology::Css => "CSS",
            Technology::Html => "HTML",
        };
        write!(f, "{}", name)
    }
}

/// Looks at the files directly inside a folder to guess what kind of
/// project it holds.
#[derive(Debug, Default)]
pub struct FolderClassifier;

impl FolderClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Subfolders are not inspected.
    pub fn classify(&self, dir: &Path) -> Result<Option<Technology>> {
        let mut extensions = HashSet::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
                extensions.insert(ext.to_string());
            }
        }

        Ok(Technology::PRIORITY
            .into_iter()
            .find(|tech| extensions.contains(tech.extension())))
    }
}
