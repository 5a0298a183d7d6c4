//! Configuration for the console core
//!
//! Every knob here has a default matching the stock console behaviour. The
//! randomized generator ranges and weights are defaults rather than contracts:
//! they shape simulated content only.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{ConsoleError, ConsoleResult};

/// Maximum sensor count shown by the console
pub const MAX_SENSORS: u8 = 4;

// ----------------------------------------------------------------------------
// Store Configuration
// ----------------------------------------------------------------------------

/// Initial values and limits for the [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Sensors reported online at startup (0..=4)
    pub sensors_online: u8,
    /// Keep only the most recent N log entries. `None` keeps everything.
    pub log_capacity: Option<usize>,
    /// Notifier message shown before the first start/stop
    pub telegram_initial_message: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sensors_online: MAX_SENSORS,
            log_capacity: None,
            telegram_initial_message: "Waiting for system start".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.sensors_online > MAX_SENSORS {
            return Err(ConsoleError::invalid_config(format!(
                "sensors_online must be at most {}, got {}",
                MAX_SENSORS, self.sensors_online
            )));
        }
        if self.log_capacity == Some(0) {
            return Err(ConsoleError::invalid_config(
                "log_capacity must be greater than 0 when set",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Generator Configuration
// ----------------------------------------------------------------------------

/// Shape of the synthetic event stream produced while the system runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lower bound of the inter-tick interval (inclusive), in milliseconds
    pub min_interval_ms: u64,
    /// Upper bound of the inter-tick interval (exclusive), in milliseconds
    pub max_interval_ms: u64,
    /// Probability of a CRITICAL detection per tick
    pub critical_weight: f64,
    /// Probability of an ALERT anomaly per tick
    pub alert_weight: f64,
    /// Attack categories drawn for CRITICAL detections
    pub attack_types: Vec<String>,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 2000,
            max_interval_ms: 5000,
            critical_weight: 0.30,
            alert_weight: 0.20,
            attack_types: vec![
                "DDoS".to_string(),
                "Malware".to_string(),
                "Zero-Day".to_string(),
                "Unauthorized Access".to_string(),
                "SQL Injection".to_string(),
            ],
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        if self.min_interval_ms == 0 {
            return Err(ConsoleError::invalid_config(
                "generator min_interval_ms must be greater than 0",
            ));
        }
        if self.max_interval_ms <= self.min_interval_ms {
            return Err(ConsoleError::invalid_config(format!(
                "generator max_interval_ms ({}) must exceed min_interval_ms ({})",
                self.max_interval_ms, self.min_interval_ms
            )));
        }
        for (name, weight) in [
            ("critical_weight", self.critical_weight),
            ("alert_weight", self.alert_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConsoleError::invalid_config(format!(
                    "generator {} must be within [0, 1], got {}",
                    name, weight
                )));
            }
        }
        if self.critical_weight + self.alert_weight > 1.0 {
            return Err(ConsoleError::invalid_config(
                "generator critical_weight + alert_weight must not exceed 1",
            ));
        }
        if self.attack_types.is_empty() {
            return Err(ConsoleError::invalid_config(
                "at least one generator attack type must be configured",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Interpreter Configuration
// ----------------------------------------------------------------------------

/// Terminal vocabulary knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Line echoed for an empty submission
    pub prompt: String,
    /// Entries shown by `logs --tail` when no count is given
    pub default_tail: usize,
    /// Fixed RNG seed for reproducible attack simulations
    pub seed: Option<u64>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            prompt: "crypton-ids> ".to_string(),
            default_tail: 5,
            seed: None,
        }
    }
}

impl InterpreterConfig {
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ConsoleError::invalid_config("prompt must not be blank"));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Console Configuration
// ----------------------------------------------------------------------------

/// Everything needed to assemble one console session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub store: StoreConfig,
    pub generator: GeneratorConfig,
    pub interpreter: InterpreterConfig,
}

impl ConsoleConfig {
    pub fn validate(&self) -> ConsoleResult<()> {
        self.store.validate()?;
        self.generator.validate()?;
        self.interpreter.validate()
    }

    /// Pin both random sources to `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator.seed = Some(seed);
        self.interpreter.seed = Some(seed);
        self
    }
}
