use crate::error::{BuilderError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            is_dir,
        }
    }
}

/// Immediate children of the source folder, split by whether they are
/// solution exports.
#[derive(Debug, Default)]
pub struct SourceListing {
    pub solutions: Vec<SourceEntry>,
    pub unsupported: Vec<SourceEntry>,
}

pub struct SourceScanner {
    filter: FileFilter,
}

impl SourceScanner {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Lists the source folder one level deep, sorted by name.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<SourceListing> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(BuilderError::InvalidPath {
                path: format!("Source folder does not exist: {}", root_path.display()),
            });
        }

        if !root_path.is_dir() {
            return Err(BuilderError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut listing = SourceListing::default();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let source_entry =
                SourceEntry::new(entry.path().to_path_buf(), entry.file_type().is_dir());

            if self.filter.is_solution_file(entry.path()) {
                listing.solutions.push(source_entry);
            } else {
                listing.unsupported.push(source_entry);
            }
        }

        Ok(listing)
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new(FileFilter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_splits_solutions_from_other_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("b.txt"), "x").unwrap();
        fs::write(root.join("A.TXT"), "x").unwrap();
        fs::write(root.join("image.png"), "x").unwrap();
        fs::create_dir(root.join("Originals")).unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("deep.txt"), "x").unwrap();

        let listing = SourceScanner::default().scan_directory(root).unwrap();

        let solutions: Vec<_> = listing.solutions.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(solutions, vec!["A.TXT", "b.txt"]);

        let unsupported: Vec<_> = listing
            .unsupported
            .iter()
            .map(|e| e.file_name.as_str())
            .collect();
        assert_eq!(unsupported, vec!["Originals", "image.png", "nested"]);
        assert!(listing.unsupported[0].is_dir);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = SourceScanner::default().scan_directory(temp_dir.path().join("nope"));
        assert!(matches!(result, Err(BuilderError::InvalidPath { .. })));
    }

    #[test]
    fn test_empty_source_yields_empty_listing() {
        let temp_dir = TempDir::new().unwrap();
        let listing = SourceScanner::default().scan_directory(temp_dir.path()).unwrap();
        assert!(listing.solutions.is_empty());
        assert!(listing.unsupported.is_empty());
    }
}
