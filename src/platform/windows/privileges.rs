//! Administrators group membership check.

use windows::Win32::Security::{
    AllocateAndInitializeSid, CheckTokenMembership, PSID, SID_IDENTIFIER_AUTHORITY,
};
use windows::core::BOOL;

use super::handles::AllocatedSid;
use super::utils::os_error;
use crate::error::PlatformError;

const SECURITY_NT_AUTHORITY: SID_IDENTIFIER_AUTHORITY = SID_IDENTIFIER_AUTHORITY {
    Value: [0, 0, 0, 0, 0, 5],
};
const SECURITY_BUILTIN_DOMAIN_RID: u32 = 0x0000_0020;
const DOMAIN_ALIAS_RID_ADMINS: u32 = 0x0000_0220;

/// Whether the access token of the current process is a member of
/// `BUILTIN\Administrators`
pub(super) fn is_administrator() -> Result<bool, PlatformError> {
    let mut sid = PSID::default();
    unsafe {
        AllocateAndInitializeSid(
            &SECURITY_NT_AUTHORITY,
            2,
            SECURITY_BUILTIN_DOMAIN_RID,
            DOMAIN_ALIAS_RID_ADMINS,
            0,
            0,
            0,
            0,
            0,
            0,
            &mut sid,
        )
        .map_err(os_error("AllocateAndInitializeSid"))?;
    }
    let admins = AllocatedSid::new(sid);

    let mut is_member = BOOL::default();
    unsafe {
        CheckTokenMembership(None, admins.raw(), &mut is_member)
            .map_err(os_error("CheckTokenMembership"))?;
    }

    Ok(is_member.as_bool())
}
