//! Service creation and start through the Service Control Manager.

use std::path::Path;

use windows::Win32::System::Services::{
    CreateServiceW, OpenSCManagerW, SC_MANAGER_CREATE_SERVICE, SERVICE_ALL_ACCESS,
    SERVICE_AUTO_START, SERVICE_ERROR_NORMAL, SERVICE_WIN32_OWN_PROCESS, StartServiceW,
};
use windows::core::PCWSTR;

use super::handles::ScHandle;
use super::utils::{os_error, to_wide};
use crate::error::PlatformError;

/// Local service database, opened with service-creation rights
fn open_service_manager() -> Result<ScHandle, PlatformError> {
    unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), SC_MANAGER_CREATE_SERVICE) }
        .map(ScHandle::new)
        .map_err(os_error("OpenSCManagerW"))
}

/// Create an auto-start, own-process service named `service_name` running
/// `executable`, then start it. Both handles are closed on return.
pub(super) fn create_and_start(service_name: &str, executable: &Path) -> Result<(), PlatformError> {
    let sc_manager = open_service_manager()?;

    let name = to_wide(service_name)?;
    let binary_path = to_wide(executable)?;

    let service = unsafe {
        CreateServiceW(
            sc_manager.raw(),
            PCWSTR::from_raw(name.as_ptr()),
            PCWSTR::from_raw(name.as_ptr()),
            SERVICE_ALL_ACCESS,
            SERVICE_WIN32_OWN_PROCESS,
            SERVICE_AUTO_START,
            SERVICE_ERROR_NORMAL,
            PCWSTR::from_raw(binary_path.as_ptr()),
            PCWSTR::null(),
            None,
            PCWSTR::null(),
            PCWSTR::null(),
            PCWSTR::null(),
        )
    }
    .map(ScHandle::new)
    .map_err(os_error("CreateServiceW"))?;

    unsafe { StartServiceW(service.raw(), None) }.map_err(os_error("StartServiceW"))?;

    Ok(())
}
