//! Identification — 1:N search of a probe against the active population,
//! plus the 1:1 verification variant used when the caller already knows the
//! claimed subject.

use std::sync::Arc;

use uuid::Uuid;
use veriprint_core::{
  Error, Result, codec,
  scorer::{NoComparator, TemplateComparator, fallback_similarity},
  store::{SubjectDirectory, TemplateStore},
  subject::SubjectRecord,
  template::{FingerPosition, Template},
};

// ─── Request / outcome ───────────────────────────────────────────────────────

/// A freshly captured template submitted for identification.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
  /// Raw capture as delivered by the device, possibly a full data URI.
  pub capture:       String,
  pub quality_score: u8,
}

/// The subject and template an accepted probe matched.
#[derive(Debug, Clone)]
pub struct MatchResult {
  pub subject:         SubjectRecord,
  pub template_id:     Uuid,
  pub finger_position: FingerPosition,
  pub score:           f64,
}

/// Outcome of an identification call. A rejection carries the best score
/// seen but deliberately no subject data.
#[derive(Debug, Clone)]
pub enum IdentifyOutcome {
  Match(MatchResult),
  NoMatch { best_score: f64 },
}

impl IdentifyOutcome {
  pub fn is_match(&self) -> bool { matches!(self, Self::Match(_)) }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Scores a probe against active templates and applies the acceptance
/// policy. The comparator is an explicitly injected capability; when absent
/// the local fallback heuristic scores every pair.
pub struct IdentificationService<S, C = NoComparator> {
  store:      Arc<S>,
  comparator: Option<Arc<C>>,
  config:     crate::EngineConfig,
}

impl<S> IdentificationService<S, NoComparator>
where
  S: TemplateStore + SubjectDirectory,
{
  /// Build a service that scores with the local fallback heuristic only.
  pub fn without_comparator(store: Arc<S>, config: crate::EngineConfig) -> Self {
    Self { store, comparator: None, config }
  }
}

impl<S, C> IdentificationService<S, C>
where
  S: TemplateStore + SubjectDirectory,
  C: TemplateComparator,
{
  pub fn new(store: Arc<S>, comparator: Arc<C>, config: crate::EngineConfig) -> Self {
    Self { store, comparator: Some(comparator), config }
  }

  /// 1:N identification: search the entire active population for the best
  /// match. A blown deadline aborts the whole call.
  pub async fn identify(&self, probe: ProbeRequest) -> Result<IdentifyOutcome> {
    // Quality gate comes first: a sub-floor probe is rejected before any
    // store read or scoring happens.
    if probe.quality_score < self.config.probe_quality_floor {
      return Ok(IdentifyOutcome::NoMatch { best_score: 0.0 });
    }

    let cleaned = codec::clean_template(&probe.capture)?;

    crate::bounded(
      "identification scan",
      self.config.call_timeout,
      self.scan_population(cleaned),
    )
    .await?
  }

  /// 1:1 verification against one claimed subject's active templates.
  pub async fn verify_subject(
    &self,
    subject_id: Uuid,
    probe: ProbeRequest,
  ) -> Result<IdentifyOutcome> {
    if probe.quality_score < self.config.probe_quality_floor {
      return Ok(IdentifyOutcome::NoMatch { best_score: 0.0 });
    }

    let cleaned = codec::clean_template(&probe.capture)?;

    crate::bounded(
      "verification scan",
      self.config.call_timeout,
      self.scan_subject(subject_id, cleaned),
    )
    .await?
  }

  async fn scan_population(&self, probe: String) -> Result<IdentifyOutcome> {
    let candidates = self
      .store
      .list_active()
      .await
      .map_err(Error::store_read)?;

    let Some((template, best)) = self.best_candidate(&probe, &candidates).await
    else {
      return Ok(IdentifyOutcome::NoMatch { best_score: 0.0 });
    };

    if !self.accepts(best) {
      return Ok(IdentifyOutcome::NoMatch { best_score: best });
    }

    let subject = SubjectDirectory::resolve_subject(&*self.store, template.subject_id)
      .await
      .map_err(Error::store_read)?
      .ok_or(Error::SubjectNotFound(template.subject_id))?;

    Ok(IdentifyOutcome::Match(MatchResult {
      subject,
      template_id: template.template_id,
      finger_position: template.finger_position,
      score: best,
    }))
  }

  async fn scan_subject(
    &self,
    subject_id: Uuid,
    probe: String,
  ) -> Result<IdentifyOutcome> {
    let subject = SubjectDirectory::resolve_subject(&*self.store, subject_id)
      .await
      .map_err(Error::store_read)?
      .ok_or(Error::SubjectNotFound(subject_id))?;

    let candidates = self
      .store
      .list_active_for_subject(subject_id)
      .await
      .map_err(Error::store_read)?;

    let Some((template, best)) = self.best_candidate(&probe, &candidates).await
    else {
      return Ok(IdentifyOutcome::NoMatch { best_score: 0.0 });
    };

    if !self.accepts(best) {
      return Ok(IdentifyOutcome::NoMatch { best_score: best });
    }

    Ok(IdentifyOutcome::Match(MatchResult {
      subject,
      template_id: template.template_id,
      finger_position: template.finger_position,
      score: best,
    }))
  }

  /// Score every candidate and keep the maximum. Ties keep the first-seen
  /// candidate: the comparison below is strict, and candidates arrive in
  /// the store's stable scan order.
  async fn best_candidate<'a>(
    &self,
    probe: &str,
    candidates: &'a [Template],
  ) -> Option<(&'a Template, f64)> {
    let mut best: Option<(&Template, f64)> = None;

    for candidate in candidates {
      let score = self.score_pair(probe, &candidate.payload).await;
      if best.is_none_or(|(_, s)| score > s) {
        best = Some((candidate, score));
      }
    }

    best
  }

  /// Score one pair. Comparator failures — backend errors, out-of-range
  /// answers, per-call timeouts — score the candidate zero so one bad call
  /// cannot abort the scan.
  async fn score_pair(&self, probe: &str, candidate: &str) -> f64 {
    let Some(comparator) = &self.comparator else {
      return fallback_similarity(probe, candidate);
    };

    let outcome = tokio::time::timeout(
      self.config.call_timeout,
      comparator.compare(probe, candidate),
    )
    .await;

    match outcome {
      Ok(Ok(score)) => match score.validated() {
        Ok(v) => v,
        Err(e) => {
          tracing::warn!(error = %e, "comparator answer rejected; scoring 0");
          0.0
        }
      },
      Ok(Err(e)) => {
        tracing::warn!(error = %e, "comparator call failed; scoring 0");
        0.0
      }
      Err(_) => {
        tracing::warn!("comparator call timed out; scoring 0");
        0.0
      }
    }
  }

  /// Acceptance policy: the primary threshold OR the looser secondary band.
  ///
  /// The secondary band (strictly above 0.3 by default) nearly subsumes the
  /// primary threshold, which makes the 0.85 check close to vestigial. Both
  /// branches are kept deliberately — unifying them is a product decision,
  /// not a code fix. See DESIGN.md.
  fn accepts(&self, best: f64) -> bool {
    best >= self.config.match_threshold || best > self.config.secondary_floor
  }
}
