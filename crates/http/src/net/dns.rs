//! Reverse DNS lookups for accepted connections.

use std::net::SocketAddr;

use tracing::trace;

/// Whether a lookup may answer with the numeric address when no name is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameLookup {
    BestEffort,
    NameRequired,
}

/// Resolves `addr` to a host name on the blocking pool.
///
/// Returns `None` when the lookup fails, so callers can fall back to the textual address.
pub(crate) async fn reverse_lookup(addr: SocketAddr, mode: NameLookup) -> Option<String> {
    match tokio::task::spawn_blocking(move || name_info(addr, mode)).await {
        Ok(name) => name,
        Err(e) => {
            trace!(cause = %e, %addr, "reverse lookup task failed");
            None
        }
    }
}

#[cfg(unix)]
fn name_info(addr: SocketAddr, mode: NameLookup) -> Option<String> {
    use socket2::SockAddr;
    use std::ffi::CStr;
    use std::ptr;

    const NI_MAXHOST: usize = 1025;

    let sock_addr = SockAddr::from(addr);
    let mut host = [0u8; NI_MAXHOST];
    let flags = match mode {
        NameLookup::BestEffort => 0,
        NameLookup::NameRequired => libc::NI_NAMEREQD,
    };

    // SAFETY: `sock_addr` is a valid socket address of `sock_addr.len()` bytes, `host` is a
    // writable buffer of the length passed, and no service buffer is requested.
    let rc = unsafe {
        libc::getnameinfo(
            sock_addr.as_ptr(),
            sock_addr.len(),
            host.as_mut_ptr().cast::<libc::c_char>(),
            NI_MAXHOST as libc::socklen_t,
            ptr::null_mut(),
            0,
            flags,
        )
    };

    if rc != 0 {
        trace!(rc, %addr, ?mode, "getnameinfo failed");
        return None;
    }

    CStr::from_bytes_until_nul(&host)
        .ok()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

#[cfg(not(unix))]
fn name_info(_addr: SocketAddr, _mode: NameLookup) -> Option<String> {
    None
}
