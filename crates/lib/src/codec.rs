//! Conversion between raw separator-joined PATH values and ordered entry lists.

/// A single path string as stored in a PATH variable.
pub type PathEntry = String;

/// Native list separator for the host platform.
#[cfg(windows)]
pub const NATIVE_SEPARATOR: char = ';';

/// Native list separator for the host platform.
#[cfg(not(windows))]
pub const NATIVE_SEPARATOR: char = ':';

/// Splits and joins PATH-shaped values.
///
/// Decoding drops segments that are empty after trimming and keeps every
/// other segment verbatim, in order, duplicates included. Encoding is a plain
/// join, so `decode(encode(decode(s))) == decode(s)` for any `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathListCodec {
  separator: char,
}

impl PathListCodec {
  pub const fn new(separator: char) -> Self {
    Self { separator }
  }

  /// Codec using the host platform's separator.
  pub const fn native() -> Self {
    Self::new(NATIVE_SEPARATOR)
  }

  pub const fn separator(&self) -> char {
    self.separator
  }

  pub fn decode(&self, raw: &str) -> Vec<PathEntry> {
    raw
      .split(self.separator)
      .filter(|segment| !segment.trim().is_empty())
      .map(str::to_string)
      .collect()
  }

  pub fn encode<S: AsRef<str>>(&self, entries: &[S]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
      if i > 0 {
        out.push(self.separator);
      }
      out.push_str(entry.as_ref());
    }
    out
  }
}

impl Default for PathListCodec {
  fn default() -> Self {
    Self::native()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const WIN: PathListCodec = PathListCodec::new(';');

  #[test]
  fn decode_drops_empty_segments_and_keeps_order() {
    assert_eq!(WIN.decode(r"C:\A;;C:\B;"), vec![r"C:\A", r"C:\B"]);
  }

  #[test]
  fn decode_drops_whitespace_only_segments() {
    assert_eq!(WIN.decode(r"C:\A;   ;C:\B"), vec![r"C:\A", r"C:\B"]);
  }

  #[test]
  fn decode_keeps_duplicates() {
    assert_eq!(WIN.decode(r"C:\A;C:\B;C:\A"), vec![r"C:\A", r"C:\B", r"C:\A"]);
  }

  #[test]
  fn decode_empty_is_empty_list() {
    assert!(WIN.decode("").is_empty());
    assert!(WIN.decode(";;;").is_empty());
  }

  #[test]
  fn encode_empty_list_is_empty_string() {
    let empty: [&str; 0] = [];
    assert_eq!(WIN.encode(&empty), "");
  }

  #[test]
  fn clean_value_roundtrips_exactly() {
    let raw = r"C:\Windows;C:\Windows\System32;%USERPROFILE%\bin";
    assert_eq!(WIN.encode(&WIN.decode(raw)), raw);
  }

  #[test]
  fn decoding_is_idempotent_after_encode() {
    for raw in [r";C:\A;;C:\B; ;C:\A;", "", ";", r"C:\Program Files\x"] {
      let once = WIN.decode(raw);
      assert_eq!(WIN.decode(&WIN.encode(&once)), once, "input {raw:?}");
    }
  }

  #[test]
  fn native_codec_matches_platform() {
    assert_eq!(PathListCodec::default().separator(), NATIVE_SEPARATOR);
  }
}
