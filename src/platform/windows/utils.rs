//! Wide strings, OS error mapping and the cached system directory.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use windows::Win32::System::SystemInformation::GetSystemDirectoryW;

use crate::error::PlatformError;

pub(super) const MAX_PATH: usize = 260;

// Resolved on first use, read-only afterwards
static SYSTEM_DIRECTORY: OnceCell<PathBuf> = OnceCell::new();

/// NUL-terminated UTF-16 copy of `s`
pub(super) fn to_wide(s: impl AsRef<OsStr>) -> Result<Vec<u16>, PlatformError> {
    let s = s.as_ref();
    let wide: Vec<u16> = s.encode_wide().collect();
    if wide.contains(&0) {
        return Err(PlatformError::Encoding(s.to_string_lossy().into_owned()));
    }
    Ok(wide.into_iter().chain(std::iter::once(0)).collect())
}

/// UTF-16 bytes of `s` including the terminator, as registry string data
pub(super) fn wide_bytes(s: &str) -> Result<Vec<u8>, PlatformError> {
    Ok(to_wide(s)?.iter().flat_map(|unit| unit.to_le_bytes()).collect())
}

/// Closure turning a `windows` crate error into a [`PlatformError`]
pub(super) fn os_error(operation: &'static str) -> impl FnOnce(windows::core::Error) -> PlatformError {
    move |e| PlatformError::Os {
        operation,
        message: e.to_string(),
    }
}

/// `%SystemRoot%\System32`, as reported by the OS
pub(super) fn system_directory() -> Result<&'static Path, PlatformError> {
    SYSTEM_DIRECTORY
        .get_or_try_init(|| {
            let mut buffer = [0u16; MAX_PATH];
            let len = unsafe { GetSystemDirectoryW(Some(&mut buffer)) } as usize;
            if len == 0 || len > buffer.len() {
                return Err(PlatformError::Os {
                    operation: "GetSystemDirectoryW",
                    message: std::io::Error::last_os_error().to_string(),
                });
            }
            Ok(PathBuf::from(String::from_utf16_lossy(&buffer[..len])))
        })
        .map(PathBuf::as_path)
}

/// Value of a required environment variable
pub(super) fn env_dir(name: &'static str) -> Result<PathBuf, PlatformError> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(PlatformError::MissingEnvironment(name))
}
