//! Text rendering and parsing of backup records.
//!
//! ```text
//! # pathedit backup
//! id: 20261019081200123
//! captured_at: 2026-10-19T08:12:00.123Z
//!
//! [System]
//! C:\Windows;C:\Windows\System32
//!
//! [User]
//! %USERPROFILE%\bin
//!
//! [Session]
//! C:\Windows;C:\Windows\System32;C:\Users\me\bin
//! ```
//!
//! A scope that could not be read has no block. It gets an
//! `unreadable: <Scope>: <error>` line after `captured_at` instead.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::scope::Scope;

use super::BackupRecord;

/// First line of every record.
pub const HEADER: &str = "# pathedit backup";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("missing '# pathedit backup' header")]
  MissingHeader,

  #[error("missing '{0}' field")]
  MissingField(&'static str),

  #[error("invalid timestamp {0:?}")]
  InvalidTimestamp(String),

  #[error("unexpected line {line}: {text:?}")]
  UnexpectedLine { line: usize, text: String },
}

/// Current time truncated to whole milliseconds, the precision records keep.
pub(super) fn now() -> SystemTime {
  let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
  UNIX_EPOCH + Duration::from_millis(since_epoch.as_millis() as u64)
}

/// Record id derived from the capture time: `YYYYMMDDhhmmssmmm`.
pub(super) fn id_for(time: SystemTime) -> String {
  humantime::format_rfc3339_millis(time)
    .to_string()
    .chars()
    .filter(char::is_ascii_digit)
    .collect()
}

pub(super) fn render(record: &BackupRecord) -> String {
  let mut out = String::new();
  out.push_str(HEADER);
  out.push('\n');
  out.push_str(&format!("id: {}\n", record.id));
  out.push_str(&format!(
    "captured_at: {}\n",
    humantime::format_rfc3339_millis(record.captured_at)
  ));
  for (scope, error) in &record.unreadable {
    out.push_str(&format!("unreadable: {}: {}\n", scope, error.replace('\n', " ")));
  }

  for (scope, value) in &record.values {
    out.push_str(&format!("\n[{}]\n{}\n", scope, value));
  }
  out
}

pub(super) fn parse(content: &str) -> Result<BackupRecord, ParseError> {
  let mut lines = content.lines().enumerate();
  match lines.next() {
    Some((_, line)) if line.trim_end() == HEADER => {}
    _ => return Err(ParseError::MissingHeader),
  }

  let mut id = None;
  let mut captured_at = None;
  let mut values = BTreeMap::new();
  let mut unreadable = BTreeMap::new();
  let mut block: Option<(Scope, Vec<&str>)> = None;

  for (number, line) in lines {
    if let Some(scope) = section_header(line) {
      if let Some((scope, body)) = block.take() {
        values.insert(scope, join_block(body));
      }
      block = Some((scope, Vec::new()));
      continue;
    }

    if let Some((_, body)) = block.as_mut() {
      body.push(line);
    } else if let Some(value) = line.strip_prefix("id: ") {
      id = Some(value.trim().to_string());
    } else if let Some(value) = line.strip_prefix("captured_at: ") {
      let value = value.trim();
      let time = humantime::parse_rfc3339(value).map_err(|_| ParseError::InvalidTimestamp(value.to_string()))?;
      captured_at = Some(time);
    } else if let Some(value) = line.strip_prefix("unreadable: ") {
      let (scope, error) = value
        .split_once(": ")
        .and_then(|(scope, error)| Some((scope.parse::<Scope>().ok()?, error)))
        .ok_or_else(|| ParseError::UnexpectedLine {
          line: number + 1,
          text: line.to_string(),
        })?;
      unreadable.insert(scope, error.to_string());
    } else if !line.trim().is_empty() {
      return Err(ParseError::UnexpectedLine {
        line: number + 1,
        text: line.to_string(),
      });
    }
  }

  if let Some((scope, body)) = block.take() {
    values.insert(scope, join_block(body));
  }

  Ok(BackupRecord {
    id: id.ok_or(ParseError::MissingField("id"))?,
    captured_at: captured_at.ok_or(ParseError::MissingField("captured_at"))?,
    values,
    unreadable,
  })
}

fn section_header(line: &str) -> Option<Scope> {
  line
    .strip_prefix('[')
    .and_then(|rest| rest.strip_suffix(']'))
    .and_then(|name| name.parse().ok())
}

/// Join a block's lines, dropping the blank separator lines at its end.
fn join_block(mut body: Vec<&str>) -> String {
  while body.last().is_some_and(|line| line.is_empty()) {
    body.pop();
  }
  body.join("\n")
}
