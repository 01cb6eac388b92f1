//! Platform capabilities behind small traits, one implementation per OS family.
//!
//! The backend is chosen at compile time; only the one for the target OS is
//! built and linked. [`HostPlatform`] names it.
//!
//! - Windows: Service Control Manager, registry, event log, start menu
//! - POSIX: effective UID check; service, PATH and shortcut integration are
//!   no-ops because unit files and `/usr/local/bin` cover them

use std::path::Path;
use std::process::Command;

use crate::config::RegistryValue;
use crate::error::{InstallError, PlatformError};
use crate::layout::InstallLayout;

mod env_path;

pub use env_path::{join_path_value, PATH_SEPARATOR};

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use self::windows::WindowsPlatform as HostPlatform;
    } else if #[cfg(unix)] {
        mod posix;
        pub use self::posix::PosixPlatform as HostPlatform;
    } else {
        compile_error!("bundle-installer supports Windows and POSIX targets only");
    }
}

/// Operating system family a backend drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Posix,
    Windows,
}

/// Whether the current process runs elevated
pub trait PrivilegeChecker {
    fn is_privileged(&self) -> Result<bool, PlatformError>;
}

/// Managed service registration. Best-effort: failures are logged.
pub trait ServiceRegistrar {
    fn register_and_start(&self, executable: &Path);
}

/// Machine-wide executable search path
pub trait PathPublisher {
    fn publish_path(&self, directory: &Path) -> Result<(), PlatformError>;
}

/// User-visible launch entry. Best-effort: failures are logged.
pub trait ShortcutPublisher {
    fn publish_shortcut(&self, executable: &Path);
}

/// Event-log source registration. Best-effort: failures are logged.
pub trait EventLogRegistrar {
    fn register_event_source(&self, application_name: &str);
}

/// Registry key provisioning from the manifest
pub trait RegistryProvisioner {
    fn provision_key(&self, key: &str, values: &[RegistryValue]) -> Result<(), PlatformError>;
}

/// Builds the process that runs one post-install command line
pub trait CommandShell {
    fn shell_command(&self, command_line: &str) -> Command;
}

/// Everything the installer needs from the host
pub trait Platform:
    PrivilegeChecker
    + ServiceRegistrar
    + PathPublisher
    + ShortcutPublisher
    + EventLogRegistrar
    + RegistryProvisioner
    + CommandShell
{
    const KIND: PlatformKind;

    /// Target directories for `application_name`
    fn layout(&self, application_name: &str) -> Result<InstallLayout, InstallError>;
}
