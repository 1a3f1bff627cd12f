//! Tunable thresholds and deadlines for the services.

use std::time::Duration;

/// Service configuration. The defaults are the deployed production values;
/// override per environment via the server's config file.
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Minimum capture quality accepted at enrollment.
  pub enroll_quality_floor: u8,
  /// Minimum probe quality accepted at identification. Strictly below the
  /// enrollment floor — probes are noisier than enrollment captures.
  pub probe_quality_floor:  u8,
  /// Primary acceptance threshold on the best similarity score.
  pub match_threshold:      f64,
  /// Secondary acceptance band: best score strictly above this value is
  /// also accepted. See `IdentificationService::accepts`.
  pub secondary_floor:      f64,
  /// Deadline applied to each store call, each comparator call, and the
  /// identification call as a whole.
  pub call_timeout:         Duration,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      enroll_quality_floor: 40,
      probe_quality_floor:  30,
      match_threshold:      0.85,
      secondary_floor:      0.3,
      call_timeout:         Duration::from_secs(15),
    }
  }
}
