//! Template codec — normalises a captured template string before storage
//! or comparison.
//!
//! Capture devices hand us either a bare base64 payload or a full data URI
//! (`data:application/octet-stream;base64,<payload>`). Cleaning strips the
//! URI prefix and then drops every character outside the base64 alphabet.
//!
//! Malformed-but-nonempty input is deliberately not rejected: stray
//! characters are stripped and the remainder is kept. Only a capture that
//! cleans down to nothing is an error.

use base64::alphabet;

use crate::{Error, Result};

/// Marker that terminates a data-URI prefix.
const BASE64_MARKER: &str = "base64,";

fn is_base64_char(c: char) -> bool {
  c == '=' || alphabet::STANDARD.as_str().contains(c)
}

/// Clean a raw capture into its comparison- and storage-ready form.
///
/// Idempotent: cleaning an already-clean payload returns it unchanged.
pub fn clean_template(raw: &str) -> Result<String> {
  let body = match raw.find(BASE64_MARKER) {
    Some(idx) => &raw[idx + BASE64_MARKER.len()..],
    None => raw,
  };

  let cleaned: String = body.chars().filter(|c| is_base64_char(*c)).collect();

  if cleaned.is_empty() {
    return Err(Error::InvalidTemplate(
      "capture is empty after cleaning".to_owned(),
    ));
  }

  Ok(cleaned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_data_uri_prefix() {
    let cleaned =
      clean_template("data:application/octet-stream;base64,XYZ==").unwrap();
    assert_eq!(cleaned, "XYZ==");
  }

  #[test]
  fn clean_input_is_unchanged() {
    let payload = "aGVsbG8gd29ybGQ=";
    assert_eq!(clean_template(payload).unwrap(), payload);
  }

  #[test]
  fn cleaning_is_idempotent() {
    let once = clean_template("ab c!d@e#f==").unwrap();
    let twice = clean_template(&once).unwrap();
    assert_eq!(once, twice);
  }

  #[test]
  fn strips_characters_outside_alphabet() {
    assert_eq!(clean_template("a\nb\tc d?!").unwrap(), "abcd");
  }

  #[test]
  fn nonempty_garbage_degrades_silently() {
    // Permissive by contract: stray characters are dropped, not rejected.
    assert_eq!(clean_template("<<<abc>>>").unwrap(), "abc");
  }

  #[test]
  fn empty_input_is_rejected() {
    assert!(matches!(clean_template(""), Err(Error::InvalidTemplate(_))));
  }

  #[test]
  fn all_garbage_input_is_rejected() {
    assert!(matches!(
      clean_template("???!!!"),
      Err(Error::InvalidTemplate(_))
    ));
  }

  #[test]
  fn prefix_with_empty_payload_is_rejected() {
    assert!(matches!(
      clean_template("data:image/png;base64,"),
      Err(Error::InvalidTemplate(_))
    ));
  }
}
