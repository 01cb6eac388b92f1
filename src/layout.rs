//! Target directories per platform family.

use std::path::{Component, Path, PathBuf};

use crate::bundle::Category;

/// Capability invoked with the full path of a file right after it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostWriteHook {
    /// Register the file as a service and start it
    RegisterService,
    /// Publish a start menu entry pointing at the file
    PublishShortcut,
}

/// Where one category lands and what happens after each write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTarget {
    pub dir: PathBuf,
    pub hook: Option<PostWriteHook>,
}

/// Every directory the installer writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    program_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: Option<PathBuf>,
    service: CategoryTarget,
    gui: CategoryTarget,
}

impl InstallLayout {
    /// `/usr/local/bin/<app>`, `/var/lib/<app>`, `/var/log/<app>` and
    /// `/etc/systemd/system/`. No hooks: systemd picks the unit file up itself.
    pub fn posix(application_name: &str) -> Self {
        let program_dir = Path::new("/usr/local/bin").join(application_name);
        Self {
            data_dir: Path::new("/var/lib").join(application_name),
            log_dir: Some(Path::new("/var/log").join(application_name)),
            service: CategoryTarget {
                dir: PathBuf::from("/etc/systemd/system"),
                hook: None,
            },
            gui: CategoryTarget {
                dir: program_dir.clone(),
                hook: None,
            },
            program_dir,
        }
    }

    /// `<program_files>\<app>` and `<program_data>\<app>`. Service and GUI
    /// files live with the program files and are registered after writing.
    pub fn windows(application_name: &str, program_files: &Path, program_data: &Path) -> Self {
        let program_dir = program_files.join(application_name);
        Self {
            data_dir: program_data.join(application_name),
            log_dir: None,
            service: CategoryTarget {
                dir: program_dir.clone(),
                hook: Some(PostWriteHook::RegisterService),
            },
            gui: CategoryTarget {
                dir: program_dir.clone(),
                hook: Some(PostWriteHook::PublishShortcut),
            },
            program_dir,
        }
    }

    /// Move every directory under `root`, keeping hooks
    pub fn rerooted(self, root: &Path) -> Self {
        Self {
            program_dir: reroot(root, &self.program_dir),
            data_dir: reroot(root, &self.data_dir),
            log_dir: self.log_dir.map(|dir| reroot(root, &dir)),
            service: CategoryTarget {
                dir: reroot(root, &self.service.dir),
                hook: self.service.hook,
            },
            gui: CategoryTarget {
                dir: reroot(root, &self.gui.dir),
                hook: self.gui.hook,
            },
        }
    }

    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn target(&self, category: Category) -> CategoryTarget {
        match category {
            Category::Data => CategoryTarget {
                dir: self.data_dir.clone(),
                hook: None,
            },
            Category::Program => CategoryTarget {
                dir: self.program_dir.clone(),
                hook: None,
            },
            Category::Gui => self.gui.clone(),
            Category::Service => self.service.clone(),
        }
    }

    /// Directories created before any file is written, deduplicated, in order
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = Vec::with_capacity(4);
        let candidates = [
            Some(self.program_dir.as_path()),
            Some(self.data_dir.as_path()),
            self.log_dir.as_deref(),
            Some(self.service.dir.as_path()),
            Some(self.gui.dir.as_path()),
        ];
        for dir in candidates.into_iter().flatten() {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

/// Join an absolute path onto `root`, dropping drive prefix and root
fn reroot(root: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    root.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_layout_matches_conventional_paths() {
        let layout = InstallLayout::posix("demo");
        assert_eq!(layout.program_dir(), Path::new("/usr/local/bin/demo"));
        assert_eq!(layout.data_dir(), Path::new("/var/lib/demo"));
        assert_eq!(layout.log_dir(), Some(Path::new("/var/log/demo")));
        assert_eq!(layout.target(Category::Service).dir, Path::new("/etc/systemd/system"));
        assert_eq!(layout.target(Category::Gui).dir, Path::new("/usr/local/bin/demo"));
        assert!(Category::ALL.iter().all(|c| layout.target(*c).hook.is_none()));
    }

    #[test]
    fn windows_layout_hooks_gui_and_service() {
        let layout = InstallLayout::windows("demo", Path::new("pf"), Path::new("pd"));
        assert_eq!(layout.program_dir(), Path::new("pf").join("demo"));
        assert_eq!(layout.data_dir(), Path::new("pd").join("demo"));
        assert_eq!(layout.log_dir(), None);
        assert_eq!(
            layout.target(Category::Service),
            CategoryTarget {
                dir: Path::new("pf").join("demo"),
                hook: Some(PostWriteHook::RegisterService),
            }
        );
        assert_eq!(layout.target(Category::Gui).hook, Some(PostWriteHook::PublishShortcut));
        assert_eq!(layout.target(Category::Data).hook, None);
        assert_eq!(layout.directories().len(), 2);
    }

    #[test]
    fn rerooting_moves_every_directory() {
        let layout = InstallLayout::posix("demo").rerooted(Path::new("/stage"));
        assert_eq!(layout.program_dir(), Path::new("/stage/usr/local/bin/demo"));
        assert_eq!(layout.log_dir(), Some(Path::new("/stage/var/log/demo")));
        assert_eq!(layout.target(Category::Service).dir, Path::new("/stage/etc/systemd/system"));
        assert_eq!(
            layout.directories(),
            [
                Path::new("/stage/usr/local/bin/demo"),
                Path::new("/stage/var/lib/demo"),
                Path::new("/stage/var/log/demo"),
                Path::new("/stage/etc/systemd/system"),
            ]
        );
    }
}
