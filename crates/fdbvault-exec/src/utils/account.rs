//! User and group name resolution through the system account database.
use std::{ffi::CString, io, mem, ptr};

use crate::ExecError;

const FALLBACK_BUF: usize = 1024;
const MAX_BUF: usize = 1 << 20;

/// Resolve a user name (or a numeric uid) to a uid.
pub fn lookup_uid(name: &str) -> Result<u32, ExecError> {
    if let Ok(uid) = name.parse::<u32>() {
        return Ok(uid);
    }
    let cname = CString::new(name).map_err(|_| ExecError::UnknownUser(name.to_string()))?;
    let mut buf = vec![0 as libc::c_char; initial_buf(libc::_SC_GETPW_R_SIZE_MAX)];
    loop {
        let mut pwd: libc::passwd = unsafe { mem::zeroed() };
        let mut found: *mut libc::passwd = ptr::null_mut();
        let rc = unsafe {
            libc::getpwnam_r(cname.as_ptr(), &mut pwd, buf.as_mut_ptr(), buf.len(), &mut found)
        };
        match rc {
            0 if found.is_null() => return Err(ExecError::UnknownUser(name.to_string())),
            0 => return Ok(pwd.pw_uid),
            libc::ERANGE if buf.len() < MAX_BUF => buf.resize(buf.len() * 2, 0),
            errno => {
                return Err(ExecError::Lookup {
                    name: name.to_string(),
                    source: io::Error::from_raw_os_error(errno),
                });
            }
        }
    }
}

/// Resolve a group name (or a numeric gid) to a gid.
pub fn lookup_gid(name: &str) -> Result<u32, ExecError> {
    if let Ok(gid) = name.parse::<u32>() {
        return Ok(gid);
    }
    let cname = CString::new(name).map_err(|_| ExecError::UnknownGroup(name.to_string()))?;
    let mut buf = vec![0 as libc::c_char; initial_buf(libc::_SC_GETGR_R_SIZE_MAX)];
    loop {
        let mut grp: libc::group = unsafe { mem::zeroed() };
        let mut found: *mut libc::group = ptr::null_mut();
        let rc = unsafe {
            libc::getgrnam_r(cname.as_ptr(), &mut grp, buf.as_mut_ptr(), buf.len(), &mut found)
        };
        match rc {
            0 if found.is_null() => return Err(ExecError::UnknownGroup(name.to_string())),
            0 => return Ok(grp.gr_gid),
            libc::ERANGE if buf.len() < MAX_BUF => buf.resize(buf.len() * 2, 0),
            errno => {
                return Err(ExecError::Lookup {
                    name: name.to_string(),
                    source: io::Error::from_raw_os_error(errno),
                });
            }
        }
    }
}

fn initial_buf(key: libc::c_int) -> usize {
    match unsafe { libc::sysconf(key) } {
        n if n > 0 => n as usize,
        _ => FALLBACK_BUF,
    }
}
