//! Configuration support for the fueling engine.
//!
//! Tunable constants are loaded from a TOML file supplied by the calling
//! layer. The library does no ambient filesystem discovery; paths are
//! always explicit.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub enhancement: EnhancementConfig,

    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Validation gate parameters for externally enhanced plans
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnhancementConfig {
    /// Allowed deviation of enhanced phase totals from the deterministic
    /// targets, in percent
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: f64,

    /// Per-item carb cap for high GI sensitivity (g)
    #[serde(default = "default_item_carb_cap_gi_high")]
    pub item_carb_cap_gi_high_g: f64,

    /// Per-item carb cap for medium GI sensitivity (g)
    #[serde(default = "default_item_carb_cap_gi_medium")]
    pub item_carb_cap_gi_medium_g: f64,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            tolerance_pct: default_tolerance_pct(),
            item_carb_cap_gi_high_g: default_item_carb_cap_gi_high(),
            item_carb_cap_gi_medium_g: default_item_carb_cap_gi_medium(),
        }
    }
}

/// Recipe selection parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Times a normalized title may be served per horizon before the
    /// "(Var N)" suffix kicks in
    #[serde(default = "default_repeat_cap")]
    pub repeat_cap: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            repeat_cap: default_repeat_cap(),
        }
    }
}

// Default value functions
fn default_tolerance_pct() -> f64 {
    10.0
}

fn default_item_carb_cap_gi_high() -> f64 {
    30.0
}

fn default_item_carb_cap_gi_medium() -> f64 {
    40.0
}

fn default_repeat_cap() -> u32 {
    2
}

impl EngineConfig {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved engine config to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.enhancement.tolerance_pct <= 0.0 || self.enhancement.tolerance_pct > 100.0 {
            return Err(Error::Config(format!(
                "tolerance_pct must be in (0, 100], got {}",
                self.enhancement.tolerance_pct
            )));
        }
        if self.selection.repeat_cap == 0 {
            return Err(Error::Config("repeat_cap must be at least 1".into()));
        }
        Ok(())
    }
}
