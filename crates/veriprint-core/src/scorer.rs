//! Similarity scoring between two cleaned template payloads.
//!
//! Two paths exist. The primary path delegates to an injected
//! [`TemplateComparator`] capability — typically an adapter over a vendor
//! matching SDK. The fallback path is [`fallback_similarity`], a pure local
//! heuristic used when no comparator is configured.
//!
//! The fallback is order- and length-sensitive and is a heuristic
//! placeholder only — it is not a biometric-grade comparison and must never
//! be treated as a security primitive.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Comparator capability ───────────────────────────────────────────────────

/// A score as reported by an external comparator.
///
/// Vendor backends disagree on the wire shape: some return a bare number,
/// some an object with a `score` field. The untagged serde representation
/// resolves both shapes once, at the adapter boundary; everything past this
/// type works with a plain `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparatorScore {
  Plain(f64),
  Structured { score: f64 },
}

impl ComparatorScore {
  pub fn value(self) -> f64 {
    match self {
      Self::Plain(v) => v,
      Self::Structured { score } => score,
    }
  }

  /// Extract the score, rejecting anything outside `[0.0, 1.0]` or
  /// non-finite.
  pub fn validated(self) -> Result<f64, ComparatorError> {
    let v = self.value();
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
      return Err(ComparatorError::OutOfRange(v));
    }
    Ok(v)
  }
}

#[derive(Debug, Error)]
pub enum ComparatorError {
  /// The backend call itself failed (transport, SDK, decode).
  #[error("comparator backend error: {0}")]
  Backend(String),

  /// The backend answered with a score outside `[0.0, 1.0]`.
  #[error("comparator returned out-of-range score: {0}")]
  OutOfRange(f64),
}

/// Optional injected comparison capability.
///
/// Implementations wrap an external matching primitive. There is no ambient
/// default: callers construct one adapter and pass it by reference into the
/// identification service.
pub trait TemplateComparator: Send + Sync {
  /// Compare a probe payload against a stored candidate payload.
  fn compare<'a>(
    &'a self,
    probe: &'a str,
    candidate: &'a str,
  ) -> impl Future<Output = Result<ComparatorScore, ComparatorError>> + Send + 'a;
}

/// Stand-in for deployments without an external comparator; every call
/// fails, which scores the candidate zero. The identification service
/// short-circuits to [`fallback_similarity`] before ever invoking it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComparator;

impl TemplateComparator for NoComparator {
  async fn compare(
    &self,
    _probe: &str,
    _candidate: &str,
  ) -> Result<ComparatorScore, ComparatorError> {
    Err(ComparatorError::Backend("no comparator configured".to_owned()))
  }
}

// ─── Fallback heuristic ──────────────────────────────────────────────────────

/// Deterministic local similarity in `[0.0, 1.0]`; `1.0` means identical.
///
/// Combines length-ratio similarity (weight 0.3) with the positional
/// character-match ratio over the overlapping prefix (weight 0.7). Payloads
/// are base64 text, so byte positions and character positions coincide.
pub fn fallback_similarity(a: &str, b: &str) -> f64 {
  let min_len = a.len().min(b.len());
  let max_len = a.len().max(b.len());

  if max_len == 0 {
    return 1.0;
  }
  if min_len == 0 {
    return 0.0;
  }

  let length_similarity = min_len as f64 / max_len as f64;

  let matching = a
    .bytes()
    .zip(b.bytes())
    .filter(|(x, y)| x == y)
    .count();
  let char_similarity = matching as f64 / min_len as f64;

  0.3 * length_similarity + 0.7 * char_similarity
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_payloads_score_exactly_one() {
    assert_eq!(fallback_similarity("abc123==", "abc123=="), 1.0);
  }

  #[test]
  fn disjoint_payloads_score_only_length_component() {
    // No positional matches: score is 0.3 * length ratio.
    let score = fallback_similarity("aaaa", "bbbb");
    assert!((score - 0.3).abs() < 1e-12);
  }

  #[test]
  fn score_is_bounded() {
    let pairs = [
      ("", ""),
      ("a", ""),
      ("abc", "abc"),
      ("abc", "abd"),
      ("abcdefgh", "abc"),
      ("AAAA", "aaaa"),
    ];
    for (a, b) in pairs {
      let s = fallback_similarity(a, b);
      assert!((0.0..=1.0).contains(&s), "score {s} for ({a:?}, {b:?})");
    }
  }

  #[test]
  fn prefix_match_beats_disjoint() {
    let close = fallback_similarity("abcdef==", "abcdXY==");
    let far = fallback_similarity("abcdef==", "ZZZZZZZZ");
    assert!(close > far);
  }

  #[test]
  fn comparator_score_decodes_both_wire_shapes() {
    let plain: ComparatorScore = serde_json::from_value(serde_json::json!(0.92)).unwrap();
    assert_eq!(plain.value(), 0.92);

    let structured: ComparatorScore =
      serde_json::from_value(serde_json::json!({ "score": 0.41 })).unwrap();
    assert_eq!(structured.value(), 0.41);

    // Anything else fails to decode and never reaches scoring.
    assert!(
      serde_json::from_value::<ComparatorScore>(serde_json::json!("high")).is_err()
    );
  }

  #[test]
  fn validated_rejects_out_of_range_and_non_finite() {
    assert!(ComparatorScore::Plain(1.7).validated().is_err());
    assert!(ComparatorScore::Plain(-0.1).validated().is_err());
    assert!(ComparatorScore::Plain(f64::NAN).validated().is_err());
    assert_eq!(ComparatorScore::Plain(1.0).validated().unwrap(), 1.0);
    assert_eq!(
      ComparatorScore::Structured { score: 0.0 }.validated().unwrap(),
      0.0
    );
  }
}
