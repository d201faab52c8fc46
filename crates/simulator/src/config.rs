//! Simulator settings
//!
//! Cadences and latencies are plain milliseconds so a JSON file can
//! override any subset of them:
//!
//! ```json
//! { "tip_interval_ms": 3000, "seed": 42 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SimError};

/// Longest cadence or latency accepted: one day
const MAX_TIMING_MS: u64 = 24 * 60 * 60 * 1000;

/// Timing and sizing knobs for a [`Simulator`](crate::Simulator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Period of the simulated-sale task
    pub inventory_decrease_interval_ms: u64,
    /// Period of the AI tip task
    pub tip_interval_ms: u64,
    /// Delay before the second batch of swap offers appears
    pub late_offers_delay_ms: u64,
    /// Latency of the read accessors
    pub read_latency_ms: u64,
    /// Latency of request / accept / decline
    pub action_latency_ms: u64,
    /// Latency of node assignment during onboarding
    pub assignment_latency_ms: u64,
    /// Latency of phone verification during onboarding
    pub phone_verification_latency_ms: u64,
    /// Most recent tips retained
    pub max_tips: usize,
    /// Upper bound of a simulated sale (lower bound is 1)
    pub max_decrease: u32,
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            inventory_decrease_interval_ms: 5_000,
            tip_interval_ms: 8_000,
            late_offers_delay_ms: 12_000,
            read_latency_ms: 100,
            action_latency_ms: 500,
            assignment_latency_ms: 1_000,
            phone_verification_latency_ms: 1_500,
            max_tips: 5,
            max_decrease: 3,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| SimError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::Parse(format!("simulator config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("inventory_decrease_interval_ms", self.inventory_decrease_interval_ms),
            ("tip_interval_ms", self.tip_interval_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(SimError::InvalidConfig(format!("{} must be positive", field)));
            }
        }

        let timings = [
            ("inventory_decrease_interval_ms", self.inventory_decrease_interval_ms),
            ("tip_interval_ms", self.tip_interval_ms),
            ("late_offers_delay_ms", self.late_offers_delay_ms),
            ("read_latency_ms", self.read_latency_ms),
            ("action_latency_ms", self.action_latency_ms),
            ("assignment_latency_ms", self.assignment_latency_ms),
            ("phone_verification_latency_ms", self.phone_verification_latency_ms),
        ];
        for (field, value) in timings {
            if value > MAX_TIMING_MS {
                return Err(SimError::InvalidConfig(format!(
                    "{} must not exceed {} ms",
                    field, MAX_TIMING_MS
                )));
            }
        }
        if self.max_tips == 0 {
            return Err(SimError::InvalidConfig("max_tips must be positive".to_string()));
        }
        if self.max_decrease == 0 {
            return Err(SimError::InvalidConfig(
                "max_decrease must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Zero every latency; cadences are untouched
    pub fn without_latency(mut self) -> Self {
        self.read_latency_ms = 0;
        self.action_latency_ms = 0;
        self.assignment_latency_ms = 0;
        self.phone_verification_latency_ms = 0;
        self
    }

    pub fn inventory_decrease_interval(&self) -> Duration {
        Duration::from_millis(self.inventory_decrease_interval_ms)
    }

    pub fn tip_interval(&self) -> Duration {
        Duration::from_millis(self.tip_interval_ms)
    }

    pub fn late_offers_delay(&self) -> Duration {
        Duration::from_millis(self.late_offers_delay_ms)
    }

    pub fn read_latency(&self) -> Duration {
        Duration::from_millis(self.read_latency_ms)
    }

    pub fn action_latency(&self) -> Duration {
        Duration::from_millis(self.action_latency_ms)
    }

    pub fn assignment_latency(&self) -> Duration {
        Duration::from_millis(self.assignment_latency_ms)
    }

    pub fn phone_verification_latency(&self) -> Duration {
        Duration::from_millis(self.phone_verification_latency_ms)
    }
}
