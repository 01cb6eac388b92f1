//! POSIX backend.
//!
//! Only the privilege check does real work. Service registration is covered
//! by deploying the unit file into `/etc/systemd/system`, the program
//! directory sits under `/usr/local/bin`, and there is no menu to publish to,
//! so those capabilities log and return.

use std::path::Path;
use std::process::Command;

use log::debug;

use super::{
    CommandShell, EventLogRegistrar, PathPublisher, Platform, PlatformKind, PrivilegeChecker,
    RegistryProvisioner, ServiceRegistrar, ShortcutPublisher,
};
use crate::config::RegistryValue;
use crate::error::{InstallError, PlatformError};
use crate::layout::InstallLayout;

#[derive(Debug, Clone)]
pub struct PosixPlatform {
    application_name: String,
}

impl PosixPlatform {
    pub fn new(application_name: &str) -> Self {
        Self {
            application_name: application_name.to_string(),
        }
    }
}

impl PrivilegeChecker for PosixPlatform {
    /// Root means effective UID 0. Never fails.
    fn is_privileged(&self) -> Result<bool, PlatformError> {
        Ok(nix::unistd::geteuid().is_root())
    }
}

impl ServiceRegistrar for PosixPlatform {
    fn register_and_start(&self, executable: &Path) {
        debug!(
            "{}: service unit picked up by systemd, nothing to register for {}",
            self.application_name,
            executable.display()
        );
    }
}

impl PathPublisher for PosixPlatform {
    fn publish_path(&self, directory: &Path) -> Result<(), PlatformError> {
        debug!("{} is expected on the default search path", directory.display());
        Ok(())
    }
}

impl ShortcutPublisher for PosixPlatform {
    fn publish_shortcut(&self, executable: &Path) {
        debug!("No menu entry published for {}", executable.display());
    }
}

impl EventLogRegistrar for PosixPlatform {
    fn register_event_source(&self, application_name: &str) {
        debug!("{application_name}: logs go to /var/log/{application_name}");
    }
}

impl RegistryProvisioner for PosixPlatform {
    fn provision_key(&self, key: &str, values: &[RegistryValue]) -> Result<(), PlatformError> {
        debug!("Ignoring registry key {key} ({} values) on POSIX", values.len());
        Ok(())
    }
}

impl CommandShell for PosixPlatform {
    fn shell_command(&self, command_line: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line);
        command
    }
}

impl Platform for PosixPlatform {
    const KIND: PlatformKind = PlatformKind::Posix;

    fn layout(&self, application_name: &str) -> Result<InstallLayout, InstallError> {
        Ok(InstallLayout::posix(application_name))
    }
}
