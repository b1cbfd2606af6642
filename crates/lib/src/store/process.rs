use crate::scope::Scope;

use super::StoreError;

/// The Session scope: a variable in this process's environment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnv {
  var: String,
}

impl ProcessEnv {
  pub fn new(var: impl Into<String>) -> Self {
    Self { var: var.into() }
  }

  pub fn read(&self) -> String {
    std::env::var_os(&self.var)
      .map(|value| value.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  pub fn write(&self, value: &str) -> Result<(), StoreError> {
    if value.contains('\0') {
      return Err(StoreError::Write {
        scope: Scope::Session,
        message: "value contains a NUL character".to_string(),
      });
    }

    // SAFETY: the editor is single-threaded; no other thread reads or writes
    // the environment while the session value is replaced.
    unsafe { std::env::set_var(&self.var, value) };
    Ok(())
  }
}
