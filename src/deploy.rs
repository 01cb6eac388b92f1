//! Writing bundle files to their target directories.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::bundle::Category;
use crate::error::InstallError;
use crate::layout::PostWriteHook;

/// Mode given to every written file on Unix
#[cfg(unix)]
const FILE_MODE: u32 = 0o755;

/// One bundle file on its way to disk
#[derive(Debug)]
pub struct FileDescriptor<'a> {
    pub category: Category,
    pub target_dir: PathBuf,
    pub name: String,
    pub content: Cow<'a, [u8]>,
    pub post_write: Option<PostWriteHook>,
}

/// What [`write_file`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// Data file left as found
    Preserved(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Preserved(path) => path,
        }
    }
}

impl FileDescriptor<'_> {
    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.name)
    }
}

/// Write `file` to `target_dir/name`.
///
/// Data files never replace an existing file, so user and runtime changes
/// survive a re-install. Every other category is overwritten.
pub fn write_file(file: &FileDescriptor<'_>) -> Result<WriteOutcome, InstallError> {
    let path = file.target_path();

    if file.category == Category::Data && path.exists() {
        info!("Data file already exists: {}", path.display());
        return Ok(WriteOutcome::Preserved(path));
    }

    fs::write(&path, &file.content).map_err(|source| InstallError::WriteFile {
        path: path.clone(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(FILE_MODE)).map_err(|source| {
            InstallError::WriteFile {
                path: path.clone(),
                source,
            }
        })?;
    }

    info!("Installed: {}", path.display());
    Ok(WriteOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor<'a>(category: Category, dir: &Path, content: &'a [u8]) -> FileDescriptor<'a> {
        FileDescriptor {
            category,
            target_dir: dir.to_path_buf(),
            name: "file.bin".to_string(),
            content: Cow::Borrowed(content),
            post_write: None,
        }
    }

    #[test]
    fn data_file_is_written_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = write_file(&descriptor(Category::Data, dir.path(), b"embedded")).unwrap();
        assert_eq!(outcome, WriteOutcome::Written(dir.path().join("file.bin")));
        assert_eq!(fs::read(outcome.path()).unwrap(), b"embedded");
    }

    #[test]
    fn existing_data_file_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file.bin"), b"edited by user").unwrap();

        let outcome = write_file(&descriptor(Category::Data, dir.path(), b"embedded")).unwrap();
        assert!(matches!(outcome, WriteOutcome::Preserved(_)));
        assert_eq!(fs::read(dir.path().join("file.bin")).unwrap(), b"edited by user");
    }

    #[test]
    fn other_categories_always_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        for category in [Category::Program, Category::Gui, Category::Service] {
            fs::write(dir.path().join("file.bin"), b"stale").unwrap();
            let outcome = write_file(&descriptor(category, dir.path(), b"fresh")).unwrap();
            assert!(matches!(outcome, WriteOutcome::Written(_)), "{category}");
            assert_eq!(fs::read(dir.path().join("file.bin")).unwrap(), b"fresh");
        }
    }

    #[test]
    fn write_into_missing_directory_is_fatal_with_exit_code_2() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = write_file(&descriptor(Category::Program, &missing, b"x")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn written_files_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let outcome = write_file(&descriptor(Category::Program, dir.path(), b"#!/bin/sh\n")).unwrap();
        let mode = fs::metadata(outcome.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
