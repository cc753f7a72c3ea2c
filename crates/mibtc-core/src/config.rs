//! Agent configuration
//!
//! Loaded from YAML. Every section and key is optional:
//!
//! ```yaml
//! logging:
//!   profile: production
//!   filter: "mibtc=debug"
//! defaults:
//!   providers: [zero-dot-zero, unspecified-address]
//! registration:
//!   seed_rows: 1
//! write:
//!   sequential_fallback: true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::{MibError, Result};
use crate::logging_facility::Profile;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub logging: LoggingConfig,
    pub defaults: DefaultsConfig,
    pub registration: RegistrationConfig,
    pub write: WriteConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
    /// Replaces the profile's default filter; `RUST_LOG` still wins
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Install the global subscriber described by this section
    pub fn install(&self) {
        crate::logging_facility::init_with_filter(self.profile, self.filter.as_deref());
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Provider names, consulted in this order
    pub providers: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                "zero-dot-zero".to_string(),
                "unspecified-address".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrationConfig {
    /// Rows instantiated per table at startup, indexed 1..=seed_rows
    pub seed_rows: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { seed_rows: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriteConfig {
    /// Retry a batch one varbind at a time when it fails only because a
    /// TestAndIncr or RowStatus column has no instance yet
    pub sequential_fallback: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            sequential_fallback: true,
        }
    }
}

impl AgentConfig {
    /// # Errors
    ///
    /// `Config` if the YAML is malformed, has unknown keys or names an
    /// unknown provider.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AgentConfig = serde_yaml::from_str(content).map_err(|e| MibError::Config {
            reason: format!("YAML parse error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`AgentConfig::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MibError::Io {
            message: format!("Failed to read config {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        for name in &self.defaults.providers {
            if crate::defaults::providers::by_name(name).is_none() {
                return Err(MibError::Config {
                    reason: format!("unknown default provider {:?}", name),
                });
            }
        }
        Ok(())
    }
}
