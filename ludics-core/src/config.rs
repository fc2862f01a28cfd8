//! Runtime configuration

use crate::compose::CompositionMode;
use crate::saturation::{Checker, CliqueLimits};
use log::info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_PATH: &str = "ludics-store.json";

/// Settings shared by the checker, the composition layer and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LudicsConfig {
    /// Caps on maximal-clique enumeration during negative saturation
    pub limits: CliqueLimits,
    /// Mode used when a preflight request names none
    pub composition_mode: CompositionMode,
    /// JSON snapshot backing the design store
    pub store_path: String,
    /// Behaviour files checked at once by `ludics check`
    pub max_parallel_checks: usize,
}

impl Default for LudicsConfig {
    fn default() -> Self {
        Self {
            limits: CliqueLimits::default(),
            composition_mode: CompositionMode::Assoc,
            store_path: DEFAULT_STORE_PATH.to_string(),
            max_parallel_checks: 8,
        }
    }
}

impl LudicsConfig {
    pub fn checker(&self) -> Checker {
        Checker::new(self.limits)
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Saved config to {}", path);
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    /// `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
