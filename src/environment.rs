//! Ambient environment signals merged into every event
//!
//! Each signal is a best-effort probe of an optional platform capability:
//! network information, device memory, and user-preference media queries.
//! Missing capabilities produce absent fields (or a documented default),
//! never errors.

use crate::value::{ParamValue, ParameterMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub const LIGHT_SCHEME_QUERY: &str = "(prefers-color-scheme: light)";
pub const NO_PREFERENCE_SCHEME_QUERY: &str = "(prefers-color-scheme: no preference)";

/// Network information as exposed by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInformation {
    pub effective_type: String,
    pub save_data: bool,
}

/// Read accessors for ambient platform capabilities
pub trait EnvironmentProbe {
    /// Network information, `None` if the capability is missing
    fn network_information(&self) -> Option<NetworkInformation>;

    /// Approximate device memory in gigabytes, `None` if unsupported
    fn device_memory(&self) -> Option<f64>;

    /// Evaluate a media query; `None` if media queries are unsupported
    fn match_media(&self, query: &str) -> Option<bool>;

    /// Current vertical scroll offset of the page
    fn scroll_y(&self) -> f64;
}

/// Preferred color scheme, first match wins in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Dark,
    Light,
    NoPreference,
    NotSupported,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Dark => "dark",
            ColorScheme::Light => "light",
            ColorScheme::NoPreference => "no preference",
            ColorScheme::NotSupported => "not supported",
        }
    }

    /// Probe the three preference queries in order
    pub fn detect(probe: &dyn EnvironmentProbe) -> Self {
        let matches = |query: &str| probe.match_media(query).unwrap_or(false);
        if matches(DARK_SCHEME_QUERY) {
            ColorScheme::Dark
        } else if matches(LIGHT_SCHEME_QUERY) {
            ColorScheme::Light
        } else if matches(NO_PREFERENCE_SCHEME_QUERY) {
            ColorScheme::NoPreference
        } else {
            ColorScheme::NotSupported
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat snapshot of ambient signals
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub effective_type: Option<String>,
    pub data_saver: Option<String>,
    pub device_memory: Option<String>,
    pub prefers_reduced_motion: String,
    pub prefers_color_scheme: ColorScheme,
}

impl EnvironmentSnapshot {
    /// Merge the snapshot into an event parameter map; absent fields are skipped
    pub fn insert_into(&self, params: &mut ParameterMap) {
        let optional = [
            ("effective_type", &self.effective_type),
            ("data_saver", &self.data_saver),
            ("device_memory", &self.device_memory),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(key.to_string(), ParamValue::Text(value.clone()));
            }
        }
        params.insert(
            "prefers_reduced_motion".to_string(),
            ParamValue::Text(self.prefers_reduced_motion.clone()),
        );
        params.insert(
            "prefers_color_scheme".to_string(),
            ParamValue::from(self.prefers_color_scheme.as_str()),
        );
    }
}

/// Read every ambient signal once
pub fn snapshot(probe: &dyn EnvironmentProbe) -> EnvironmentSnapshot {
    let network = probe.network_information();
    let prefers_reduced_motion = probe
        .match_media(REDUCED_MOTION_QUERY)
        .unwrap_or(false)
        .to_string();

    EnvironmentSnapshot {
        effective_type: network.as_ref().map(|n| n.effective_type.clone()),
        data_saver: network.as_ref().map(|n| n.save_data.to_string()),
        device_memory: probe.device_memory().map(|gb| gb.to_string()),
        prefers_reduced_motion,
        prefers_color_scheme: ColorScheme::detect(probe),
    }
}

/// A fixed environment, typically loaded from a page capture
///
/// `media` maps query strings to their result. When `media_supported` is
/// false every query reports unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticEnvironment {
    pub connection: Option<NetworkInformation>,
    pub device_memory: Option<f64>,
    pub media_supported: bool,
    pub media: HashMap<String, bool>,
    pub scroll_y: f64,
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self {
            connection: None,
            device_memory: None,
            media_supported: true,
            media: HashMap::new(),
            scroll_y: 0.0,
        }
    }
}

impl StaticEnvironment {
    /// Mark a media query as matching
    pub fn with_media(mut self, query: &str, matches: bool) -> Self {
        self.media.insert(query.to_string(), matches);
        self
    }

    pub fn with_connection(mut self, effective_type: &str, save_data: bool) -> Self {
        self.connection = Some(NetworkInformation {
            effective_type: effective_type.to_string(),
            save_data,
        });
        self
    }

    pub fn with_device_memory(mut self, gigabytes: f64) -> Self {
        self.device_memory = Some(gigabytes);
        self
    }
}

impl EnvironmentProbe for StaticEnvironment {
    fn network_information(&self) -> Option<NetworkInformation> {
        self.connection.clone()
    }

    fn device_memory(&self) -> Option<f64> {
        self.device_memory
    }

    fn match_media(&self, query: &str) -> Option<bool> {
        if !self.media_supported {
            return None;
        }
        Some(self.media.get(query).copied().unwrap_or(false))
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_environment() {
        let env = StaticEnvironment::default()
            .with_connection("4g", false)
            .with_device_memory(8.0)
            .with_media(REDUCED_MOTION_QUERY, true)
            .with_media(DARK_SCHEME_QUERY, true);

        let snap = snapshot(&env);
        assert_eq!(snap.effective_type.as_deref(), Some("4g"));
        assert_eq!(snap.data_saver.as_deref(), Some("false"));
        assert_eq!(snap.device_memory.as_deref(), Some("8"));
        assert_eq!(snap.prefers_reduced_motion, "true");
        assert_eq!(snap.prefers_color_scheme, ColorScheme::Dark);
    }

    #[test]
    fn test_fractional_device_memory() {
        let env = StaticEnvironment::default().with_device_memory(0.5);
        assert_eq!(snapshot(&env).device_memory.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_missing_network_drops_both_fields() {
        let snap = snapshot(&StaticEnvironment::default());
        assert_eq!(snap.effective_type, None);
        assert_eq!(snap.data_saver, None);
        assert_eq!(snap.device_memory, None);
    }

    #[test]
    fn test_reduced_motion_defaults_to_false_without_media_support() {
        let env = StaticEnvironment {
            media_supported: false,
            ..Default::default()
        };
        let snap = snapshot(&env);
        assert_eq!(snap.prefers_reduced_motion, "false");
        assert_eq!(snap.prefers_color_scheme, ColorScheme::NotSupported);
    }

    #[test]
    fn test_color_scheme_first_match_order() {
        let both = StaticEnvironment::default()
            .with_media(LIGHT_SCHEME_QUERY, true)
            .with_media(DARK_SCHEME_QUERY, true);
        assert_eq!(ColorScheme::detect(&both), ColorScheme::Dark);

        let light = StaticEnvironment::default().with_media(LIGHT_SCHEME_QUERY, true);
        assert_eq!(ColorScheme::detect(&light), ColorScheme::Light);

        let none = StaticEnvironment::default().with_media(NO_PREFERENCE_SCHEME_QUERY, true);
        assert_eq!(ColorScheme::detect(&none), ColorScheme::NoPreference);

        // Supported queries, none matching
        assert_eq!(
            ColorScheme::detect(&StaticEnvironment::default()),
            ColorScheme::NotSupported
        );
    }

    #[test]
    fn test_insert_into_skips_absent_fields() {
        let mut params = ParameterMap::new();
        snapshot(&StaticEnvironment::default()).insert_into(&mut params);

        assert_eq!(params.len(), 2);
        assert_eq!(
            params["prefers_color_scheme"],
            ParamValue::Text("not supported".into())
        );
        assert_eq!(
            params["prefers_reduced_motion"],
            ParamValue::Text("false".into())
        );
    }

    #[test]
    fn test_static_environment_from_json() {
        let json = r#"{
            "connection": {"effectiveType": "3g", "saveData": true},
            "deviceMemory": 4,
            "media": {"(prefers-color-scheme: light)": true},
            "scrollY": 320.5
        }"#;
        let env: StaticEnvironment = serde_json::from_str(json).unwrap();
        assert!(env.media_supported);
        let snap = snapshot(&env);
        assert_eq!(snap.data_saver.as_deref(), Some("true"));
        assert_eq!(snap.device_memory.as_deref(), Some("4"));
        assert_eq!(snap.prefers_color_scheme, ColorScheme::Light);
        assert_eq!(env.scroll_y(), 320.5);
    }
}
