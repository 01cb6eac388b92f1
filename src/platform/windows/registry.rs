//! Registry operations: system `Path`, event-log source, manifest keys.

use std::path::Path;

use log::info;
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, REG_DWORD, REG_EXPAND_SZ, REG_OPTION_NON_VOLATILE,
    REG_SZ, REG_VALUE_TYPE, RegCreateKeyExW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
};
use windows::core::PCWSTR;

use super::handles::RegKey;
use super::utils::{os_error, system_directory, to_wide, wide_bytes};
use crate::config::{RegistryData, RegistryValue};
use crate::error::PlatformError;
use crate::platform::join_path_value;

const ENVIRONMENT_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
const EVENT_LOG_APPLICATION_KEY: &str = r"SYSTEM\CurrentControlSet\Services\EventLog\Application";
const EVENT_MESSAGE_FILE: &str = "EventCreate.exe";

// EVENTLOG_ERROR_TYPE | EVENTLOG_WARNING_TYPE | EVENTLOG_INFORMATION_TYPE
const TYPES_SUPPORTED: u32 = 7;

/// Append `directory` to the machine-wide `Path` value
pub(super) fn append_to_system_path(directory: &Path) -> Result<(), PlatformError> {
    let segment = directory
        .to_str()
        .ok_or_else(|| PlatformError::Encoding(directory.to_string_lossy().into_owned()))?;

    let key = open_key(ENVIRONMENT_KEY)?;
    let current = query_string(&key, "Path")?;

    let updated = join_path_value(&current, segment);
    set_raw_value(&key, "Path", REG_EXPAND_SZ, &wide_bytes(&updated)?)?;
    info!("Added {segment} to the system Path");
    Ok(())
}

/// Register `application_name` as an Application event-log source
pub(super) fn register_event_source(application_name: &str) -> Result<(), PlatformError> {
    let key = create_key(&format!("{EVENT_LOG_APPLICATION_KEY}\\{application_name}"))?;

    let message_file = system_directory()?.join(EVENT_MESSAGE_FILE);
    let message_file = message_file.to_string_lossy();
    set_raw_value(&key, "EventMessageFile", REG_SZ, &wide_bytes(&message_file)?)?;

    set_value(&key, &RegistryValue::dword("TypesSupported", TYPES_SUPPORTED))?;
    set_value(&key, &RegistryValue::dword("CustomSource", 1))?;
    Ok(())
}

/// Create or open `HKLM\<key_path>` and write every value
pub(super) fn provision_key(key_path: &str, values: &[RegistryValue]) -> Result<(), PlatformError> {
    let key = create_key(key_path)?;
    for value in values {
        set_value(&key, value)?;
    }
    Ok(())
}

fn open_key(path: &str) -> Result<RegKey, PlatformError> {
    let path = to_wide(path)?;
    let mut handle = HKEY::default();
    unsafe {
        RegOpenKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR::from_raw(path.as_ptr()),
            None,
            KEY_ALL_ACCESS,
            &mut handle,
        )
    }
    .ok()
    .map_err(os_error("RegOpenKeyExW"))?;
    Ok(RegKey::new(handle))
}

fn create_key(path: &str) -> Result<RegKey, PlatformError> {
    let path = to_wide(path)?;
    let mut handle = HKEY::default();
    unsafe {
        RegCreateKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR::from_raw(path.as_ptr()),
            None,
            PCWSTR::null(),
            REG_OPTION_NON_VOLATILE,
            KEY_ALL_ACCESS,
            None,
            &mut handle,
            None,
        )
    }
    .ok()
    .map_err(os_error("RegCreateKeyExW"))?;
    Ok(RegKey::new(handle))
}

/// Read a string value: size first, then content. A missing value reads as
/// empty.
fn query_string(key: &RegKey, name: &str) -> Result<String, PlatformError> {
    let name = to_wide(name)?;
    let mut size: u32 = 0;

    let status = unsafe {
        RegQueryValueExW(
            key.raw(),
            PCWSTR::from_raw(name.as_ptr()),
            None,
            None,
            None,
            Some(&mut size),
        )
    };
    if status == ERROR_FILE_NOT_FOUND {
        return Ok(String::new());
    }
    status.ok().map_err(os_error("RegQueryValueExW (size)"))?;

    let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
    unsafe {
        RegQueryValueExW(
            key.raw(),
            PCWSTR::from_raw(name.as_ptr()),
            None,
            None,
            Some(buffer.as_mut_ptr().cast::<u8>()),
            Some(&mut size),
        )
    }
    .ok()
    .map_err(os_error("RegQueryValueExW"))?;

    buffer.truncate(size as usize / 2);
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
    Ok(String::from_utf16_lossy(&buffer))
}

fn set_value(key: &RegKey, value: &RegistryValue) -> Result<(), PlatformError> {
    match &value.data {
        RegistryData::ExpandString(s) => {
            set_raw_value(key, &value.name, REG_EXPAND_SZ, &wide_bytes(s)?)
        }
        RegistryData::Dword(n) => set_raw_value(key, &value.name, REG_DWORD, &n.to_le_bytes()),
    }
}

fn set_raw_value(
    key: &RegKey,
    name: &str,
    kind: REG_VALUE_TYPE,
    data: &[u8],
) -> Result<(), PlatformError> {
    let name = to_wide(name)?;
    unsafe {
        RegSetValueExW(
            key.raw(),
            PCWSTR::from_raw(name.as_ptr()),
            None,
            kind,
            Some(data),
        )
    }
    .ok()
    .map_err(os_error("RegSetValueExW"))
}
