//! Server configuration, loaded from a TOML file with `VERIPRINT_*`
//! environment overrides.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use veriprint_engine::EngineConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Path to the SQLite database file; `~` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub engine:     EngineSettings,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8420 }
fn default_store_path() -> PathBuf { PathBuf::from("veriprint.db") }

/// Threshold and deadline overrides; defaults mirror [`EngineConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
  pub enroll_quality_floor: u8,
  pub probe_quality_floor:  u8,
  pub match_threshold:      f64,
  pub secondary_floor:      f64,
  pub call_timeout_secs:    u64,
}

impl Default for EngineSettings {
  fn default() -> Self {
    let cfg = EngineConfig::default();
    Self {
      enroll_quality_floor: cfg.enroll_quality_floor,
      probe_quality_floor:  cfg.probe_quality_floor,
      match_threshold:      cfg.match_threshold,
      secondary_floor:      cfg.secondary_floor,
      call_timeout_secs:    cfg.call_timeout.as_secs(),
    }
  }
}

impl EngineSettings {
  pub fn to_engine_config(&self) -> EngineConfig {
    EngineConfig {
      enroll_quality_floor: self.enroll_quality_floor,
      probe_quality_floor:  self.probe_quality_floor,
      match_threshold:      self.match_threshold,
      secondary_floor:      self.secondary_floor,
      call_timeout:         Duration::from_secs(self.call_timeout_secs),
    }
  }
}
