// Configuration for the vitals reporter
//
// Constants that shape every emitted event: the event category, the
// non-interaction flag, the placeholder for missing targets, and how script
// identities are resolved. Loadable from TOML.

use crate::long_task::ScriptFieldPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reporter configuration
///
/// # Example
/// ```
/// use vitalscope::config::ReporterConfig;
///
/// let config = ReporterConfig::default();
/// assert_eq!(config.event_category, "Web Vitals");
/// assert_eq!(config.not_set_label, "(not set)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Value of the `event_category` parameter on every event
    pub event_category: String,

    /// Value of the `nonInteraction` parameter on every event
    ///
    /// Web Vitals events must not affect bounce rate, so this stays true
    /// unless the collector is configured differently.
    pub non_interaction: bool,

    /// Placeholder used when a target element is unknown
    pub not_set_label: String,

    /// Optional experiment tag sent as `debug_version`
    ///
    /// Default: "defer-chart". Set to an empty string in TOML to omit it.
    pub debug_version: Option<String>,

    /// Script identity resolution for LoAF attribution
    ///
    /// - "legacy" (default): sourceLocation → invoker → name, invokerType → type
    /// - "canonical": sourceLocation and invokerType only
    pub script_fields: ScriptFieldPolicy,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            event_category: "Web Vitals".to_string(),
            non_interaction: true,
            not_set_label: "(not set)".to_string(),
            debug_version: Some("defer-chart".to_string()),
            script_fields: ScriptFieldPolicy::Legacy,
        }
    }
}

impl ReporterConfig {
    /// Load configuration from a TOML file, filling gaps with defaults
    ///
    /// # Example TOML
    /// ```toml
    /// event_category = "Web Vitals"
    /// not_set_label = "(not set)"
    /// script_fields = "canonical"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read reporter config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).with_context(|| "Failed to parse reporter config TOML")?;

        // TOML has no null; an empty tag means "don't send one"
        if config.debug_version.as_deref() == Some("") {
            config.debug_version = None;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid reporter config: {}", e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.event_category.trim().is_empty() {
            return Err("event_category must not be empty".to_string());
        }

        if self.not_set_label.is_empty() {
            return Err("not_set_label must not be empty".to_string());
        }

        Ok(())
    }
}
