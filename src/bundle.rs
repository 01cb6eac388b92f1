//! Bundle providers: where the files being installed come from.
//!
//! A bundle has four flat categories, each mapping file names to bytes. The
//! default provider is the table generated by `build.rs`; a directory with
//! the same layout can stand in for it at run time.

use std::borrow::Cow;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::BundleError;

mod embedded {
    include!(concat!(env!("OUT_DIR"), "/bundle_table.rs"));
}

/// File category. Decides target directory, overwrite policy and hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Data,
    Program,
    Gui,
    Service,
}

impl Category {
    /// Deployment order
    pub const ALL: [Category; 4] = [Self::Data, Self::Program, Self::Gui, Self::Service];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Program => "program",
            Self::Gui => "gui",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the files to install
pub trait BundleProvider {
    /// File names of one category, in deployment order
    fn list(&self, category: Category) -> Result<Vec<String>, BundleError>;

    /// Content of one file
    fn read(&self, category: Category, name: &str) -> Result<Cow<'_, [u8]>, BundleError>;
}

/// Files compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundle;

impl BundleProvider for EmbeddedBundle {
    fn list(&self, category: Category) -> Result<Vec<String>, BundleError> {
        Ok(embedded::ENTRIES
            .iter()
            .filter(|(c, _, _)| *c == category.as_str())
            .map(|(_, name, _)| (*name).to_string())
            .collect())
    }

    fn read(&self, category: Category, name: &str) -> Result<Cow<'_, [u8]>, BundleError> {
        embedded::ENTRIES
            .iter()
            .find(|(c, n, _)| *c == category.as_str() && *n == name)
            .map(|(_, _, bytes)| Cow::Borrowed(*bytes))
            .ok_or_else(|| BundleError::MissingEntry {
                category: category.as_str(),
                name: name.to_string(),
            })
    }
}

/// Manifest text embedded next to the files
pub(crate) fn embedded_manifest() -> &'static str {
    embedded::MANIFEST
}

/// A bundle laid out on disk as `<root>/{data,program,gui,service}/<file>`
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BundleProvider for DirectoryBundle {
    fn list(&self, category: Category) -> Result<Vec<String>, BundleError> {
        let dir = self.root.join(category.as_str());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(BundleError::Io { path: dir, source }),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| BundleError::Io {
                path: dir.clone(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => names.push(name),
                Ok(_) => {}
                Err(name) => log::warn!("Skipping non UTF-8 bundle file {name:?} in {}", dir.display()),
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, category: Category, name: &str) -> Result<Cow<'_, [u8]>, BundleError> {
        let path = self.root.join(category.as_str()).join(name);
        std::fs::read(&path)
            .map(Cow::Owned)
            .map_err(|source| BundleError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_bundle_lists_sorted_regular_files_only() {
        let root = tempfile::tempdir().unwrap();
        let program = root.path().join("program");
        std::fs::create_dir_all(program.join("nested")).unwrap();
        std::fs::write(program.join("zeta"), b"z").unwrap();
        std::fs::write(program.join("alpha"), b"a").unwrap();
        std::fs::write(program.join(".hidden"), b"h").unwrap();

        let bundle = DirectoryBundle::new(root.path());
        assert_eq!(bundle.list(Category::Program).unwrap(), ["alpha", "zeta"]);
        assert_eq!(bundle.read(Category::Program, "zeta").unwrap().as_ref(), b"z");
    }

    #[test]
    fn missing_category_directory_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let bundle = DirectoryBundle::new(root.path());
        assert!(bundle.list(Category::Gui).unwrap().is_empty());
    }

    #[test]
    fn embedded_bundle_reads_what_it_lists() {
        let bundle = EmbeddedBundle;
        for category in Category::ALL {
            for name in bundle.list(category).unwrap() {
                assert!(bundle.read(category, &name).is_ok(), "{category}/{name}");
            }
        }
        assert!(matches!(
            bundle.read(Category::Data, "no-such-file"),
            Err(BundleError::MissingEntry { .. })
        ));
    }
}
