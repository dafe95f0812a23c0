use crate::config::SortConfig;
use crate::error::Result;
use crate::extractor::move_path;
use crate::sorter::classifier::{FolderClassifier, Technology};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedFile {
    pub file: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMove {
    pub folder: PathBuf,
    pub technology: Technology,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConflict {
    pub path: PathBuf,
    pub reason: String,
}

/// Folders to relocate, computed without touching the filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortPlan {
    pub moves: Vec<FolderMove>,
    pub unclassified: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortReport {
    pub dry_run: bool,
    pub wrapped: Vec<WrappedFile>,
    pub moved: Vec<FolderMove>,
    pub unclassified: Vec<PathBuf>,
    pub conflicts: Vec<SortConflict>,
}

impl SortReport {
    pub fn has_changes(&self) -> bool {
        !self.wrapped.is_empty() || !self.moved.is_empty()
    }
}

/// Groups project folders under technology buckets inside `root`.
pub struct Sorter {
    root: PathBuf,
    config: SortConfig,
    classifier: FolderClassifier,
    dry_run: bool,
}

impl Sorter {
    pub fn new<P: AsRef<Path>>(root: P, config: SortConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
            classifier: FolderClassifier::new(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Moves every top-level `.html` file to `<html bucket>/<stem>/<file>`.
    /// A file whose destination already exists is left in place and
    /// reported as a conflict.
    pub fn wrap_loose_markup(&self) -> Result<(Vec<WrappedFile>, Vec<SortConflict>)> {
        let html_bucket = self.root.join(Technology::Html.bucket_name(&self.config));
        let mut wrapped = Vec::new();
        let mut conflicts = Vec::new();

        for path in self.top_level_entries()? {
            if !path.is_file() || !has_extension(&path, Technology::Html.extension()) {
                continue;
            }

            let (Some(stem), Some(file_name)) = (path.file_stem(), path.file_name()) else {
                continue;
            };

            let folder = html_bucket.join(stem);
            let destination = folder.join(file_name);

            if destination.exists() {
                tracing::warn!(
                    file = %path.display(),
                    destination = %destination.display(),
                    "destination already exists, leaving file in place"
                );
                conflicts.push(SortConflict {
                    path,
                    reason: format!("{} already exists", destination.display()),
                });
                continue;
            }

            if !self.dry_run {
                fs::create_dir_all(&folder)?;
                move_path(&path, &destination)?;
                tracing::debug!(file = %path.display(), to = %destination.display(), "wrapped loose markup");
            }

            wrapped.push(WrappedFile {
                file: path,
                destination,
            });
        }

        Ok((wrapped, conflicts))
    }

    /// Classifies every top-level folder that is not itself a bucket.
    pub fn plan(&self) -> Result<SortPlan> {
        let mut plan = SortPlan::default();

        for path in self.top_level_entries()? {
            if !path.is_dir() || self.is_bucket(&path) {
                continue;
            }

            match self.classifier.classify(&path)? {
                Some(technology) => {
                    let Some(name) = path.file_name() else {
                        continue;
                    };
                    let destination = self
                        .root
                        .join(technology.bucket_name(&self.config))
                        .join(name);
                    plan.moves.push(FolderMove {
                        folder: path,
                        technology,
                        destination,
                    });
                }
                None => plan.unclassified.push(path),
            }
        }

        Ok(plan)
    }

    /// Carries out `plan`. A move whose destination already exists is left
    /// in place and reported as a conflict.
    pub fn apply(&self, plan: &SortPlan) -> Result<(Vec<FolderMove>, Vec<SortConflict>)> {
        let mut moved = Vec::new();
        let mut conflicts = Vec::new();

        for folder_move in &plan.moves {
            if folder_move.destination.exists() {
                tracing::warn!(
                    folder = %folder_move.folder.display(),
                    destination = %folder_move.destination.display(),
                    "destination already exists, leaving folder in place"
                );
                conflicts.push(SortConflict {
                    path: folder_move.folder.clone(),
                    reason: format!(
                        "{} already exists",
                        folder_move.destination.display()
                    ),
                });
                continue;
            }

            if !self.dry_run {
                if let Some(bucket) = folder_move.destination.parent() {
                    fs::create_dir_all(bucket)?;
                }
                move_path(&folder_move.folder, &folder_move.destination)?;
            }

            moved.push(folder_move.clone());
        }

        Ok((moved, conflicts))
    }

    pub fn run(&self) -> Result<SortReport> {
        let (wrapped, mut conflicts) = self.wrap_loose_markup()?;
        let plan = self.plan()?;
        let (moved, move_conflicts) = self.apply(&plan)?;
        conflicts.extend(move_conflicts);

        Ok(SortReport {
            dry_run: self.dry_run,
            wrapped,
            moved,
            unclassified: plan.unclassified,
            conflicts,
        })
    }

    fn is_bucket(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        Technology::PRIORITY
            .iter()
            .any(|tech| tech.bucket_name(&self.config) == name)
    }

    fn top_level_entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            entries.push(entry?.into_path());
        }
        Ok(entries)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
