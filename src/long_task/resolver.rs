// Interaction-to-script resolution
//
// Selects, among all scripts of all long tasks overlapping the interaction,
// the one that finished last. Ties keep the first script seen in log order.

use crate::long_task::entry::{LongTaskEntry, ScriptExecution};
use crate::long_task::loaf::{LoafAttribution, ScriptFieldPolicy};
use crate::metric::AttributionRecord;

/// Attribute an interaction to a long-task script using the default field policy
///
/// Returns the empty attribution when there is no attribution record, no
/// event entry, no long-task support, or no overlapping script with a
/// positive end time. Never fails.
///
/// # Example
/// ```
/// use vitalscope::long_task::{resolve, keys, LongTaskEntry, ScriptExecution};
/// use vitalscope::metric::{AttributionRecord, EventEntry};
///
/// let attribution = AttributionRecord {
///     event_entry: Some(EventEntry {
///         start_time: 100.0,
///         processing_start: 120.0,
///         processing_end: 150.0,
///         duration: 200.0,
///     }),
///     ..Default::default()
/// };
/// let log = vec![
///     LongTaskEntry::new(90.0, 150.0).with_script(ScriptExecution::new(95.0, 60.0, 110.0)),
/// ];
///
/// let loaf = resolve(Some(&attribution), &log, true);
/// assert_eq!(loaf.get_int(keys::SCRIPT_TOTAL_DURATION), Some(155));
/// ```
pub fn resolve(
    attribution: Option<&AttributionRecord>,
    long_tasks: &[LongTaskEntry],
    platform_supports_long_tasks: bool,
) -> LoafAttribution {
    resolve_with(
        attribution,
        long_tasks,
        platform_supports_long_tasks,
        ScriptFieldPolicy::default(),
    )
}

/// Attribute an interaction to a long-task script with an explicit field policy
pub fn resolve_with(
    attribution: Option<&AttributionRecord>,
    long_tasks: &[LongTaskEntry],
    platform_supports_long_tasks: bool,
    policy: ScriptFieldPolicy,
) -> LoafAttribution {
    let Some(event) = attribution.and_then(|a| a.event_entry.as_ref()) else {
        tracing::debug!("No event entry on attribution; skipping LoAF attribution");
        return LoafAttribution::empty();
    };

    if !platform_supports_long_tasks {
        tracing::debug!("Long animation frames unsupported; skipping LoAF attribution");
        return LoafAttribution::empty();
    }

    // Zero is the sentinel: a script must end strictly after it to qualify
    let mut best: Option<(&LongTaskEntry, &ScriptExecution)> = None;
    let mut best_end = 0.0_f64;
    let mut overlapping = 0usize;

    for task in long_tasks.iter().filter(|task| task.overlaps(event)) {
        overlapping += 1;
        for script in &task.scripts {
            let end = script.end_time();
            if end > best_end {
                best_end = end;
                best = Some((task, script));
            }
        }
    }

    tracing::debug!(
        "{} of {} long tasks overlap event window [{}, {})",
        overlapping,
        long_tasks.len(),
        event.start_time,
        event.end_time()
    );

    match best {
        Some((task, script)) => {
            tracing::debug!(
                "Attributed interaction to script ending at {} in task starting at {}",
                best_end,
                task.start_time
            );
            LoafAttribution::from_candidate(task, script, long_tasks.len(), policy)
        }
        None => LoafAttribution::empty(),
    }
}
