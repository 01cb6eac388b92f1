//! Owned Win32 handles, released on drop.

use windows::Win32::Security::{FreeSid, PSID};
use windows::Win32::System::Registry::{HKEY, RegCloseKey};
use windows::Win32::System::Services::{CloseServiceHandle, SC_HANDLE};

/// Service Control Manager or service handle. Both close the same way.
pub(super) struct ScHandle(SC_HANDLE);

impl ScHandle {
    pub(super) fn new(raw: SC_HANDLE) -> Self {
        Self(raw)
    }

    #[inline]
    pub(super) fn raw(&self) -> SC_HANDLE {
        self.0
    }
}

impl Drop for ScHandle {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            let _ = unsafe { CloseServiceHandle(self.0) };
        }
    }
}

/// Open registry key under `HKEY_LOCAL_MACHINE`
pub(super) struct RegKey(HKEY);

impl RegKey {
    pub(super) fn new(raw: HKEY) -> Self {
        Self(raw)
    }

    #[inline]
    pub(super) fn raw(&self) -> HKEY {
        self.0
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            let _ = unsafe { RegCloseKey(self.0) };
        }
    }
}

/// SID from `AllocateAndInitializeSid`; must go back through `FreeSid`
pub(super) struct AllocatedSid(PSID);

impl AllocatedSid {
    pub(super) fn new(raw: PSID) -> Self {
        Self(raw)
    }

    #[inline]
    pub(super) fn raw(&self) -> PSID {
        self.0
    }
}

impl Drop for AllocatedSid {
    fn drop(&mut self) {
        if !self.0.0.is_null() {
            unsafe { FreeSid(self.0) };
        }
    }
}
