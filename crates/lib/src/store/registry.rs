//! Windows registry backend.
//!
//! System and User values live under the environment keys read by the shell
//! at logon. Values are read unexpanded and written back as `REG_EXPAND_SZ`
//! so `%VAR%` references survive an edit.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use tracing::{debug, warn};
use windows_sys::Win32::Foundation::{ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_SUCCESS};
use windows_sys::Win32::System::Registry::{
  HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, REG_EXPAND_SZ, RRF_NOEXPAND, RRF_RT_REG_EXPAND_SZ, RRF_RT_REG_SZ,
  RegGetValueW, RegSetKeyValueW,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
  HWND_BROADCAST, SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_SETTINGCHANGE,
};

use crate::consts::PATH_VAR;
use crate::scope::Scope;

use super::{ProcessEnv, ScopeStore, StoreError};

const SYSTEM_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
const USER_KEY: &str = "Environment";

/// Milliseconds to wait for each top-level window to process the broadcast.
const BROADCAST_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone)]
pub struct RegistryStore {
  session: ProcessEnv,
}

impl RegistryStore {
  pub fn new(session: ProcessEnv) -> Self {
    Self { session }
  }
}

fn to_wide(s: &str) -> Vec<u16> {
  OsStr::new(s).encode_wide().chain(Some(0)).collect()
}

fn key_for(scope: Scope) -> (HKEY, &'static str) {
  match scope {
    Scope::System => (HKEY_LOCAL_MACHINE, SYSTEM_KEY),
    Scope::User | Scope::Session => (HKEY_CURRENT_USER, USER_KEY),
  }
}

fn read_value(scope: Scope) -> Result<String, StoreError> {
  let (root, subkey) = key_for(scope);
  let subkey = to_wide(subkey);
  let name = to_wide(PATH_VAR);
  let flags = RRF_RT_REG_SZ | RRF_RT_REG_EXPAND_SZ | RRF_NOEXPAND;

  let mut buffer: Vec<u16> = Vec::new();
  loop {
    let mut size_bytes = (buffer.len() * 2) as u32;
    let data = if buffer.is_empty() {
      std::ptr::null_mut()
    } else {
      buffer.as_mut_ptr() as *mut _
    };

    // SAFETY: subkey and name are NUL-terminated and outlive the call; data
    // is either null (size query) or points at `size_bytes` writable bytes.
    let status = unsafe {
      RegGetValueW(
        root,
        subkey.as_ptr(),
        name.as_ptr(),
        flags,
        std::ptr::null_mut(),
        data,
        &mut size_bytes,
      )
    };

    match status {
      ERROR_SUCCESS if buffer.is_empty() && size_bytes > 0 => {
        buffer = vec![0u16; (size_bytes as usize).div_ceil(2)];
      }
      ERROR_SUCCESS => {
        let len = (size_bytes as usize / 2).min(buffer.len());
        let value = String::from_utf16_lossy(&buffer[..len]);
        return Ok(value.trim_end_matches('\0').to_string());
      }
      ERROR_MORE_DATA => {
        buffer = vec![0u16; (size_bytes as usize).div_ceil(2)];
      }
      ERROR_FILE_NOT_FOUND => return Ok(String::new()),
      ERROR_ACCESS_DENIED => return Err(StoreError::AccessDenied { scope }),
      code => {
        return Err(StoreError::Read {
          scope,
          message: format!("RegGetValueW failed: error {}", code),
        });
      }
    }
  }
}

fn write_value(scope: Scope, value: &str) -> Result<(), StoreError> {
  let (root, subkey) = key_for(scope);
  let subkey = to_wide(subkey);
  let name = to_wide(PATH_VAR);
  let data = to_wide(value);

  // SAFETY: all buffers are NUL-terminated wide strings that outlive the call;
  // the byte count includes the terminator as REG_EXPAND_SZ requires.
  let status = unsafe {
    RegSetKeyValueW(
      root,
      subkey.as_ptr(),
      name.as_ptr(),
      REG_EXPAND_SZ,
      data.as_ptr() as *const _,
      (data.len() * 2) as u32,
    )
  };

  match status {
    ERROR_SUCCESS => Ok(()),
    ERROR_ACCESS_DENIED => Err(StoreError::AccessDenied { scope }),
    code => Err(StoreError::Write {
      scope,
      message: format!("RegSetKeyValueW failed: error {}", code),
    }),
  }
}

/// Tell top-level windows (Explorer in particular) that the environment changed.
///
/// Best-effort: a window that does not answer in time is skipped.
fn broadcast_environment_change() {
  let param = to_wide("Environment");
  let mut result = 0usize;

  // SAFETY: param is a NUL-terminated wide string that outlives the call.
  let status = unsafe {
    SendMessageTimeoutW(
      HWND_BROADCAST,
      WM_SETTINGCHANGE,
      0,
      param.as_ptr() as isize,
      SMTO_ABORTIFHUNG,
      BROADCAST_TIMEOUT_MS,
      &mut result,
    )
  };

  if status == 0 {
    warn!(error = %std::io::Error::last_os_error(), "environment change broadcast failed");
  } else {
    debug!("environment change broadcast sent");
  }
}

impl ScopeStore for RegistryStore {
  fn read(&self, scope: Scope) -> Result<String, StoreError> {
    match scope {
      Scope::Session => Ok(self.session.read()),
      Scope::System | Scope::User => read_value(scope),
    }
  }

  fn write(&mut self, scope: Scope, value: &str) -> Result<(), StoreError> {
    match scope {
      Scope::Session => self.session.write(value),
      Scope::System | Scope::User => {
        write_value(scope, value)?;
        broadcast_environment_change();
        Ok(())
      }
    }
  }

  fn describe(&self) -> String {
    "registry".to_string()
  }
}
