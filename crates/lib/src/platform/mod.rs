//! Host platform queries.

pub mod paths;

/// Returns true when the current process runs with administrative rights.
///
/// Writing the System scope needs this on Windows. The check is advisory:
/// the store still reports `AccessDenied` if a write is refused.
#[cfg(windows)]
pub fn is_elevated() -> bool {
  use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
  use windows_sys::Win32::Security::{GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation};
  use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

  // SAFETY: the token handle is only used after OpenProcessToken succeeds and
  // is closed before returning. TOKEN_ELEVATION is plain data.
  unsafe {
    let mut token: HANDLE = std::ptr::null_mut();
    if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
      return false;
    }

    let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
    let mut returned = 0u32;
    let ok = GetTokenInformation(
      token,
      TokenElevation,
      &mut elevation as *mut _ as *mut _,
      std::mem::size_of::<TOKEN_ELEVATION>() as u32,
      &mut returned,
    );
    CloseHandle(token);

    ok != 0 && elevation.TokenIsElevated != 0
  }
}

/// Returns true when the current process runs with administrative rights.
#[cfg(unix)]
pub fn is_elevated() -> bool {
  rustix::process::geteuid().is_root()
}
