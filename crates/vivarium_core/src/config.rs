//! Runtime settings for a vivarium instance.
//!
//! All knobs live in one strongly-typed value object loaded from a TOML
//! file and passed down explicitly; there is no process-wide mutable
//! configuration state.
//!
//! ## Example `vivarium.toml`
//!
//! ```toml
//! creature_name = "Wisp"
//! century_real_seconds = 2592000.0
//! lattice_size = 5
//! vault_path = "vault"
//! log_path = "logs"
//! log_level = "info"
//!
//! [vitals]
//! burst_cap_per_hour = 1.0
//! stasis_fill_rate = 0.15
//! stasis_max_hours = 72.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::lattice::DEFAULT_SIZE;

/// Default lifespan duration: one century compressed into 30 real days.
pub const DEFAULT_CENTURY_REAL_SECONDS: f64 = 30.0 * 24.0 * 3600.0;

/// Knobs governing the agent's bounded accumulators.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VitalsConfig {
    /// Maximum cumulative feed amount per hour index.
    pub burst_cap_per_hour: f64,
    /// Stasis gained per simulated hour.
    pub stasis_fill_rate: f64,
    /// Cap on the stasis accumulator.
    pub stasis_max_hours: f64,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            burst_cap_per_hour: 1.0,
            stasis_fill_rate: 0.15,
            stasis_max_hours: 72.0,
        }
    }
}

/// Resolved configuration for one vivarium process.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub creature_name: String,
    pub century_real_seconds: f64,
    pub lattice_size: usize,
    pub vault_path: String,
    pub log_path: String,
    pub log_level: String,
    pub vitals: VitalsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            creature_name: "Wisp".to_string(),
            century_real_seconds: DEFAULT_CENTURY_REAL_SECONDS,
            lattice_size: DEFAULT_SIZE,
            vault_path: "vault".to_string(),
            log_path: "logs".to_string(),
            log_level: "info".to_string(),
            vitals: VitalsConfig::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults.
    ///
    /// A missing file is created with the default contents; a malformed
    /// file is left alone and reported.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => return settings,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Malformed settings file, using defaults"
                    );
                }
            },
            Err(_) => {
                let default = Self::default();
                if let Ok(text) = toml::to_string(&default) {
                    let _ = fs::write(path, text);
                }
                return default;
            }
        }
        Self::default()
    }
}
