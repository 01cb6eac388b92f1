//! Privilege-gated installer for embedded file bundles.
//!
//! The library deploys the four bundle categories (data, program, gui,
//! service) into platform-specific directories and wires them into the host:
//! service registration, system PATH, start menu entry, event-log source and
//! post-install commands. Each OS integration sits behind a trait in
//! [`platform`], implemented once for Windows and once for POSIX, with the
//! backend picked at compile time.

pub mod bundle;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod installer;
pub mod layout;
pub mod platform;

pub use bundle::{BundleProvider, Category, DirectoryBundle, EmbeddedBundle};
pub use config::InstallerConfig;
pub use error::InstallError;
pub use installer::{InstallOptions, InstallReport, Installer};
pub use platform::{HostPlatform, Platform};
