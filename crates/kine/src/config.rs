//! Scalar configuration: link lengths and bob masses.
//!
//! These values never enter the symbolic derivation — the derived
//! expressions keep L1, L2, m1, m2 as symbols — they are only supplied as
//! numeric-function arguments at evaluation time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Link lengths (m) and bob masses (kg) of the double pendulum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
        }
    }
}

impl PendulumConfig {
    /// Load from a JSON file; absent fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
