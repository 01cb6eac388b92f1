//! Windows backend using the Service Control Manager, the registry and
//! native security APIs.

use std::os::windows::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info};

use super::{
    CommandShell, EventLogRegistrar, PathPublisher, Platform, PlatformKind, PrivilegeChecker,
    RegistryProvisioner, ServiceRegistrar, ShortcutPublisher,
};
use crate::commands::escape_cmd_metachars;
use crate::config::RegistryValue;
use crate::error::{InstallError, PlatformError};
use crate::layout::InstallLayout;

mod handles;
mod privileges;
mod registry;
mod service;
mod utils;

use utils::{env_dir, system_directory};

const START_MENU_PROGRAMS: &str = r"Microsoft\Windows\Start Menu\Programs";

#[derive(Debug, Clone)]
pub struct WindowsPlatform {
    application_name: String,
}

impl WindowsPlatform {
    pub fn new(application_name: &str) -> Self {
        Self {
            application_name: application_name.to_string(),
        }
    }

    fn shortcut_path(&self) -> Result<PathBuf, PlatformError> {
        Ok(shortcut_path_in(&env_dir("ProgramData")?, &self.application_name))
    }
}

/// `<program_data>\Microsoft\Windows\Start Menu\Programs\<app>.lnk`
fn shortcut_path_in(program_data: &Path, application_name: &str) -> PathBuf {
    program_data
        .join(START_MENU_PROGRAMS)
        .join(format!("{application_name}.lnk"))
}

impl PrivilegeChecker for WindowsPlatform {
    fn is_privileged(&self) -> Result<bool, PlatformError> {
        privileges::is_administrator()
    }
}

impl ServiceRegistrar for WindowsPlatform {
    fn register_and_start(&self, executable: &Path) {
        match service::create_and_start(&self.application_name, executable) {
            Ok(()) => info!("Service {} is running", self.application_name),
            Err(e) => error!("Failed to register service {}: {e}", self.application_name),
        }
    }
}

impl PathPublisher for WindowsPlatform {
    fn publish_path(&self, directory: &Path) -> Result<(), PlatformError> {
        registry::append_to_system_path(directory)
    }
}

impl ShortcutPublisher for WindowsPlatform {
    /// Symbolic link with a `.lnk` name, not a shell link
    fn publish_shortcut(&self, executable: &Path) {
        let link = match self.shortcut_path() {
            Ok(link) => link,
            Err(e) => {
                error!("Failed to locate the start menu: {e}");
                return;
            }
        };
        match std::os::windows::fs::symlink_file(executable, &link) {
            Ok(()) => info!("Start menu entry: {}", link.display()),
            Err(e) => error!("Failed to create start menu entry {}: {e}", link.display()),
        }
    }
}

impl EventLogRegistrar for WindowsPlatform {
    fn register_event_source(&self, application_name: &str) {
        if let Err(e) = registry::register_event_source(application_name) {
            error!("Failed to register event log source {application_name}: {e}");
        }
    }
}

impl RegistryProvisioner for WindowsPlatform {
    fn provision_key(&self, key: &str, values: &[RegistryValue]) -> Result<(), PlatformError> {
        registry::provision_key(key, values)
    }
}

impl CommandShell for WindowsPlatform {
    /// `cmd.exe /C <escaped>`, passed verbatim so the interpreter does the only
    /// parse of the command text
    fn shell_command(&self, command_line: &str) -> Command {
        let interpreter = system_directory()
            .map(|dir| dir.join("cmd.exe"))
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"));
        let mut command = Command::new(interpreter);
        command.raw_arg("/C").raw_arg(escape_cmd_metachars(command_line));
        command
    }
}

impl Platform for WindowsPlatform {
    const KIND: PlatformKind = PlatformKind::Windows;

    fn layout(&self, application_name: &str) -> Result<InstallLayout, InstallError> {
        let program_files = env_dir("PROGRAMFILES").map_err(InstallError::Layout)?;
        let program_data = env_dir("PROGRAMDATA").map_err(InstallError::Layout)?;
        Ok(InstallLayout::windows(application_name, &program_files, &program_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_lands_in_the_common_start_menu() {
        let link = shortcut_path_in(Path::new(r"C:\ProgramData"), "demo");
        assert_eq!(
            link,
            Path::new(r"C:\ProgramData\Microsoft\Windows\Start Menu\Programs\demo.lnk")
        );
    }

    #[test]
    fn shell_command_passes_escaped_text_to_cmd_c() {
        let command = WindowsPlatform::new("demo").shell_command(r#"echo "hi^bye""#);

        let program = Path::new(command.get_program());
        assert!(
            program
                .file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case("cmd.exe"))
        );

        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["/C", r#"echo ^"hi^^bye^""#]);
    }
}
