//! Shared fixtures: a recording platform and an on-disk bundle.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use bundle_installer::config::RegistryValue;
use bundle_installer::error::{InstallError, PlatformError};
use bundle_installer::layout::InstallLayout;
use bundle_installer::platform::{
    CommandShell, EventLogRegistrar, PathPublisher, Platform, PlatformKind, PrivilegeChecker,
    RegistryProvisioner, ServiceRegistrar, ShortcutPublisher,
};

/// Which layout the fake host reports
pub enum LayoutMode {
    Posix,
    Windows { program_files: PathBuf, program_data: PathBuf },
}

/// Side effects observed by the fake host, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Service(PathBuf),
    Shortcut(PathBuf),
    PathEntry(PathBuf),
    EventSource(String),
    RegistryKey(String, usize),
}

/// POSIX shell semantics with privilege answer and integrations under test control
pub struct RecordingPlatform {
    pub privileged: Result<bool, &'static str>,
    pub layout: LayoutMode,
    pub calls: RefCell<Vec<Call>>,
}

impl RecordingPlatform {
    pub fn elevated() -> Self {
        Self {
            privileged: Ok(true),
            layout: LayoutMode::Posix,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unprivileged() -> Self {
        Self {
            privileged: Ok(false),
            ..Self::elevated()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl PrivilegeChecker for RecordingPlatform {
    fn is_privileged(&self) -> Result<bool, PlatformError> {
        self.privileged.map_err(|message| PlatformError::Os {
            operation: "CheckTokenMembership",
            message: message.to_string(),
        })
    }
}

impl ServiceRegistrar for RecordingPlatform {
    fn register_and_start(&self, executable: &Path) {
        self.calls.borrow_mut().push(Call::Service(executable.to_path_buf()));
    }
}

impl PathPublisher for RecordingPlatform {
    fn publish_path(&self, directory: &Path) -> Result<(), PlatformError> {
        self.calls.borrow_mut().push(Call::PathEntry(directory.to_path_buf()));
        Ok(())
    }
}

impl ShortcutPublisher for RecordingPlatform {
    fn publish_shortcut(&self, executable: &Path) {
        self.calls.borrow_mut().push(Call::Shortcut(executable.to_path_buf()));
    }
}

impl EventLogRegistrar for RecordingPlatform {
    fn register_event_source(&self, application_name: &str) {
        self.calls
            .borrow_mut()
            .push(Call::EventSource(application_name.to_string()));
    }
}

impl RegistryProvisioner for RecordingPlatform {
    fn provision_key(&self, key: &str, values: &[RegistryValue]) -> Result<(), PlatformError> {
        self.calls
            .borrow_mut()
            .push(Call::RegistryKey(key.to_string(), values.len()));
        Ok(())
    }
}

impl CommandShell for RecordingPlatform {
    fn shell_command(&self, command_line: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line);
        command
    }
}

impl Platform for RecordingPlatform {
    const KIND: PlatformKind = PlatformKind::Posix;

    fn layout(&self, application_name: &str) -> Result<InstallLayout, InstallError> {
        Ok(match &self.layout {
            LayoutMode::Posix => InstallLayout::posix(application_name),
            LayoutMode::Windows {
                program_files,
                program_data,
            } => InstallLayout::windows(application_name, program_files, program_data),
        })
    }
}

/// Bundle directory with one file per category
pub fn sample_bundle(root: &Path) {
    for (category, name, content) in [
        ("data", "settings.conf", "listen = 8080\n"),
        ("program", "demo", "#!/bin/sh\necho demo\n"),
        ("gui", "demo-gui", "#!/bin/sh\necho gui\n"),
        ("service", "demo.service", "[Service]\nExecStart=/usr/local/bin/demo/demo\n"),
    ] {
        let dir = root.join(category);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
    }
}
