//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Env var overriding [`EngineConfig::low_stock_threshold`].
pub const LOW_STOCK_THRESHOLD_ENV: &str = "VARIMATRIX_LOW_STOCK_THRESHOLD";
/// Env var overriding [`EngineConfig::require_warning_acknowledgement`].
pub const REQUIRE_WARNING_ACK_ENV: &str = "VARIMATRIX_REQUIRE_WARNING_ACK";

/// Tunables for the policies the surrounding system may adjust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Units with stock strictly below this value are reported as low stock.
    pub low_stock_threshold: i64,
    /// Saving with advisory issues requires an explicit admin acknowledgement.
    pub require_warning_acknowledgement: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            require_warning_acknowledgement: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by environment variables, when set and parseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a caller-supplied lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let low_stock_threshold = lookup(LOW_STOCK_THRESHOLD_ENV)
            .map(|raw| {
                raw.trim().parse::<i64>().unwrap_or_else(|_| {
                    tracing::warn!(
                        value = %raw,
                        default = defaults.low_stock_threshold,
                        "{} is not an integer; using default",
                        LOW_STOCK_THRESHOLD_ENV
                    );
                    defaults.low_stock_threshold
                })
            })
            .unwrap_or(defaults.low_stock_threshold);

        let require_warning_acknowledgement = lookup(REQUIRE_WARNING_ACK_ENV)
            .map(|raw| {
                parse_flag(&raw).unwrap_or_else(|| {
                    tracing::warn!(
                        value = %raw,
                        default = defaults.require_warning_acknowledgement,
                        "{} is not a boolean; using default",
                        REQUIRE_WARNING_ACK_ENV
                    );
                    defaults.require_warning_acknowledgement
                })
            })
            .unwrap_or(defaults.require_warning_acknowledgement);

        Self {
            low_stock_threshold,
            require_warning_acknowledgement,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
