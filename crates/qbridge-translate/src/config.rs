//! Translator configuration.
//!
//! Values come from code ([`BridgeConfig::default`] plus builder methods),
//! from YAML, or from environment variables:
//!
//! - `QBRIDGE_UNITARY_FALLBACK`: `true`/`false` (default `true`)
//! - `QBRIDGE_MAX_QUBITS`: maximum qubits for execution (default unlimited)
//! - `QBRIDGE_UNITARY_TOLERANCE`: tolerance for unitarity checks (default `1e-7`)

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_UNITARY_TOLERANCE;
use crate::error::{BridgeError, BridgeResult};

/// Environment variable enabling the unitary fallback.
pub const ENV_UNITARY_FALLBACK: &str = "QBRIDGE_UNITARY_FALLBACK";
/// Environment variable limiting executed circuit width.
pub const ENV_MAX_QUBITS: &str = "QBRIDGE_MAX_QUBITS";
/// Environment variable setting the unitarity tolerance.
pub const ENV_UNITARY_TOLERANCE: &str = "QBRIDGE_UNITARY_TOLERANCE";

/// Options for [`CircuitTranslator`](crate::CircuitTranslator) and
/// [`SimulatorAdapter`](crate::SimulatorAdapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Route named gates without a dictionary entry through their closed-form matrix.
    pub unitary_fallback: bool,
    /// Refuse to execute circuits wider than this.
    pub max_qubits: Option<usize>,
    /// Tolerance for unitarity checks of explicit matrices.
    pub unitary_tolerance: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            unitary_fallback: true,
            max_qubits: None,
            unitary_tolerance: DEFAULT_UNITARY_TOLERANCE,
        }
    }
}

impl BridgeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the unitary fallback.
    #[must_use]
    pub fn with_unitary_fallback(mut self, enabled: bool) -> Self {
        self.unitary_fallback = enabled;
        self
    }

    /// Limit executed circuit width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = Some(max_qubits);
        self
    }

    /// Set the unitarity tolerance.
    #[must_use]
    pub fn with_unitary_tolerance(mut self, tolerance: f64) -> Self {
        self.unitary_tolerance = tolerance;
        self
    }

    /// Create config from environment variables, on top of the defaults.
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from a key lookup, on top of the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BridgeResult<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_UNITARY_FALLBACK) {
            config.unitary_fallback = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(BridgeError::Config(format!(
                        "{ENV_UNITARY_FALLBACK} must be a boolean, got '{other}'"
                    )));
                }
            };
        }

        if let Some(value) = lookup(ENV_MAX_QUBITS) {
            let max = value.trim().parse::<usize>().map_err(|e| {
                BridgeError::Config(format!("{ENV_MAX_QUBITS} '{value}': {e}"))
            })?;
            config.max_qubits = Some(max);
        }

        if let Some(value) = lookup(ENV_UNITARY_TOLERANCE) {
            config.unitary_tolerance = value.trim().parse::<f64>().map_err(|e| {
                BridgeError::Config(format!("{ENV_UNITARY_TOLERANCE} '{value}': {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse config from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> BridgeResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> BridgeResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> BridgeResult<()> {
        if !(self.unitary_tolerance.is_finite() && self.unitary_tolerance > 0.0) {
            return Err(BridgeError::Config(format!(
                "unitary_tolerance must be positive, got {}",
                self.unitary_tolerance
            )));
        }
        Ok(())
    }
}
