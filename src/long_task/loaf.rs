// LoAF attribution record
//
// A flat, value-only summary of the most expensive script inside the most
// relevant long task. Every numeric fact is floored to an integer; identity
// strings pass through untouched.

use crate::long_task::entry::{LongTaskEntry, ScriptExecution};
use crate::value::{floor_to_int, ParamValue, ParameterMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter names emitted for a LoAF attribution
pub mod keys {
    pub const ENTRY_START_TIME: &str = "debug_loaf_entry_start_time";
    pub const ENTRY_END_TIME: &str = "debug_loaf_entry_end_time";
    pub const ENTRY_WORK_DURATION: &str = "debug_loaf_entry_work_duration";
    pub const ENTRY_RENDER_DURATION: &str = "debug_loaf_entry_render_duration";
    pub const ENTRY_TOTAL_FORCED_STYLE_AND_LAYOUT_DURATION: &str =
        "debug_loaf_entry_total_forced_style_and_layout_duration";
    pub const ENTRY_PRE_LAYOUT_DURATION: &str = "debug_loaf_entry_pre_layout_duration";
    pub const ENTRY_STYLE_AND_LAYOUT_DURATION: &str = "debug_loaf_entry_style_and_layout_duration";

    pub const SCRIPT_TOTAL_DURATION: &str = "debug_loaf_script_total_duration";
    pub const SCRIPT_COMPILE_DURATION: &str = "debug_loaf_script_compile_duration";
    pub const SCRIPT_EXEC_DURATION: &str = "debug_loaf_script_exec_duration";
    pub const SCRIPT_SOURCE: &str = "debug_loaf_script_source";
    pub const SCRIPT_TYPE: &str = "debug_loaf_script_type";
    pub const SCRIPT_INVOKER: &str = "debug_loaf_script_invoker";
    pub const SCRIPT_SOURCE_URL: &str = "debug_loaf_script_source_url";
    pub const SCRIPT_SOURCE_FUNCTION_NAME: &str = "debug_loaf_script_source_function_name";
    pub const SCRIPT_SOURCE_CHAR_POSITION: &str = "debug_loaf_script_source_char_position";

    pub const META_LENGTH: &str = "debug_loaf_meta_length";
}

/// How script identity and classification fields are chosen
///
/// Older platforms exposed `invoker`/`name` and `type` before
/// `sourceLocation` and `invokerType` existed. `Legacy` walks the full
/// fallback chain; `Canonical` only trusts the current field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFieldPolicy {
    #[default]
    Legacy,
    Canonical,
}

impl ScriptFieldPolicy {
    /// Source identity: sourceLocation, then invoker, then name
    pub fn source<'a>(&self, script: &'a ScriptExecution) -> Option<&'a str> {
        let chain = [&script.source_location, &script.invoker, &script.name];
        self.first_non_empty(&chain)
    }

    /// Classification: invokerType, then type
    pub fn script_type<'a>(&self, script: &'a ScriptExecution) -> Option<&'a str> {
        let chain = [&script.invoker_type, &script.script_type];
        self.first_non_empty(&chain)
    }

    fn first_non_empty<'a>(&self, chain: &[&'a Option<String>]) -> Option<&'a str> {
        let depth = match self {
            ScriptFieldPolicy::Legacy => chain.len(),
            ScriptFieldPolicy::Canonical => 1,
        };
        chain
            .iter()
            .take(depth)
            .filter_map(|field| (*field).as_deref())
            .find(|s| !s.is_empty())
    }
}

/// Attribution of an interaction to a single long-task script
///
/// Empty when nothing could be attributed; otherwise every numeric field has
/// already been floored.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct LoafAttribution {
    fields: BTreeMap<String, ParamValue>,
}

impl LoafAttribution {
    /// The canonical empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the attribution for a selected task/script pair
    ///
    /// `log_length` is the number of long tasks recorded platform-wide, not
    /// just the overlapping ones.
    pub fn from_candidate(
        task: &LongTaskEntry,
        script: &ScriptExecution,
        log_length: usize,
        policy: ScriptFieldPolicy,
    ) -> Self {
        let mut loaf = Self::empty();

        // The LoAF entry itself
        loaf.insert_floor(keys::ENTRY_START_TIME, task.start_time);
        loaf.insert_floor(keys::ENTRY_END_TIME, task.end_time());
        loaf.insert_floor(keys::ENTRY_WORK_DURATION, task.work_duration());
        loaf.insert_floor(keys::ENTRY_RENDER_DURATION, task.render_duration());
        loaf.insert_floor(
            keys::ENTRY_TOTAL_FORCED_STYLE_AND_LAYOUT_DURATION,
            task.total_forced_style_and_layout_duration(),
        );
        loaf.insert_floor(keys::ENTRY_PRE_LAYOUT_DURATION, task.pre_layout_duration());
        loaf.insert_floor(
            keys::ENTRY_STYLE_AND_LAYOUT_DURATION,
            task.style_and_layout_duration(),
        );

        // The selected script
        loaf.insert_floor(keys::SCRIPT_TOTAL_DURATION, script.end_time());
        loaf.insert_floor(keys::SCRIPT_COMPILE_DURATION, script.compile_duration());
        loaf.insert_floor(keys::SCRIPT_EXEC_DURATION, script.exec_duration());
        loaf.insert_text(keys::SCRIPT_SOURCE, policy.source(script));
        loaf.insert_text(keys::SCRIPT_TYPE, policy.script_type(script));
        loaf.insert_text(keys::SCRIPT_INVOKER, script.invoker.as_deref());
        loaf.insert_text(keys::SCRIPT_SOURCE_URL, script.source_url.as_deref());
        loaf.insert_text(
            keys::SCRIPT_SOURCE_FUNCTION_NAME,
            script.source_function_name.as_deref(),
        );
        if let Some(position) = script.source_char_position {
            loaf.insert_floor(keys::SCRIPT_SOURCE_CHAR_POSITION, position);
        }

        loaf.insert_floor(keys::META_LENGTH, log_length as f64);
        loaf
    }

    fn insert_floor(&mut self, key: &str, value: f64) {
        self.fields
            .insert(key.to_string(), ParamValue::Int(floor_to_int(value)));
    }

    fn insert_text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), ParamValue::from(value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.fields.get(key)
    }

    /// Integer field lookup
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.fields.iter()
    }

    /// Spread every field into an event parameter map, overwriting collisions
    pub fn spread_into(&self, params: &mut ParameterMap) {
        for (key, value) in &self.fields {
            params.insert(key.clone(), value.clone());
        }
    }
}
