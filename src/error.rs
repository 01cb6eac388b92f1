//! Error types for the installer.
//!
//! Two severities exist. [`InstallError`] is fatal and maps to a process exit
//! status; [`PlatformError`] comes out of best-effort OS integration steps and
//! is only logged.

use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a successful installation
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when a target directory cannot be created
pub const EXIT_DIRECTORY: i32 = 1;
/// Exit status when a bundle file cannot be written
pub const EXIT_WRITE: i32 = 2;
/// Exit status when the process is not elevated
pub const EXIT_PRIVILEGES: i32 = 5;

/// Fatal installation failures. Each one aborts the forward pass.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("this software installer requires administrator or root privileges")]
    Unprivileged,

    #[error("failed to check privileges: {0}")]
    PrivilegeCheck(#[source] PlatformError),

    #[error("failed to resolve install layout: {0}")]
    Layout(#[source] PlatformError),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Process exit status reported for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unprivileged | Self::PrivilegeCheck(_) => EXIT_PRIVILEGES,
            Self::Layout(_) | Self::CreateDirectory { .. } => EXIT_DIRECTORY,
            Self::WriteFile { .. } => EXIT_WRITE,
        }
    }
}

/// Failures of a single OS integration call
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{operation} failed: {message}")]
    Os {
        operation: &'static str,
        message: String,
    },

    #[error("'{0}' cannot be encoded for the OS (interior NUL or invalid Unicode)")]
    Encoding(String),

    #[error("environment variable {0} is not set")]
    MissingEnvironment(&'static str),
}

/// Failures reading from a bundle provider. Logged, the entry is skipped.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("no {category} entry named '{name}' in bundle")]
    MissingEntry { category: &'static str, name: String },

    #[error("failed to read bundle path {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Manifest loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("application_name must not be empty")]
    EmptyApplicationName,

    #[error("application_name '{0}' must be a single path component")]
    InvalidApplicationName(String),

    #[error("registry value data must be a string or a 32-bit unsigned integer, found {0}")]
    UnsupportedRegistryData(String),
}
