use crate::error::{BuilderError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// The per-document folder that receives section files and downloaded resources.
pub struct OutputFolder {
    path: PathBuf,
}

impl OutputFolder {
    pub fn new<P: AsRef<Path>>(dest_root: P, base_name: &str) -> Self {
        Self {
            path: dest_root.as_ref().join(base_name),
        }
    }

    /// Creates the folder; an existing folder is reused.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.path).map_err(BuilderError::Io)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one section, named exactly after the section.
    pub fn write_section(&self, name: &str, content: &str) -> Result<PathBuf> {
        validate_section_name(name)?;

        let target = self.path.join(name);
        fs::write(&target, content).map_err(BuilderError::Io)?;

        Ok(target)
    }

    /// Removes the whole folder. A folder that is already gone is fine.
    pub fn cleanup_on_error(&self) -> Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuilderError::Io(e)),
        }
    }
}

/// Section names become file names; anything that is not a single plain
/// path component could escape the output folder.
pub fn validate_section_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(|c: char| c == '/' || c == '\\') => {
            Ok(())
        }
        _ => Err(BuilderError::InvalidPath {
            path: format!("Section name is not a plain file name: {:?}", name),
        }),
    }
}

/// Holds processed source files in a sibling folder of the inputs.
pub struct OriginalsArchive {
    directory: PathBuf,
}

impl OriginalsArchive {
    pub fn new<P: AsRef<Path>>(source: P, folder_name: &str) -> Self {
        Self {
            directory: source.as_ref().join(folder_name),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Moves `file` into the archive, creating it on demand.
    pub fn archive(&self, file: &Path) -> Result<PathBuf> {
        let file_name = file.file_name().ok_or_else(|| BuilderError::InvalidPath {
            path: file.display().to_string(),
        })?;

        fs::create_dir_all(&self.directory).map_err(BuilderError::Io)?;

        let target = self.directory.join(file_name);
        move_path(file, &target)?;

        Ok(target)
    }
}

/// Renames `from` to `to`. Files that cannot be renamed (for example across
/// filesystems) are copied and then deleted.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) if from.is_file() => {
            fs::copy(from, to).map_err(BuilderError::Io)?;
            fs::remove_file(from).map_err(BuilderError::Io)
        }
        Err(e) => Err(BuilderError::Io(e)),
    }
}
