// Long-Animation-Frame (LoAF) Attribution for Responsiveness Metrics
//
// Objective: Explain a slow interaction (INP/FID) by pointing at the single
// script that kept the main thread busy while the interaction was pending.
//
// Key Insight: The interaction's event window tells us *when* the delay
// happened; the long-task log tells us *what* ran then. Intersect the two,
// then pick the script that finished last inside the overlapping frames.
//
// The platform owns the long-task log and only ever appends to it. The
// resolver borrows it read-only, so every call is pure and repeatable.

mod entry;
mod loaf;
mod resolver;

pub use entry::{LongTaskEntry, LongTaskLog, ScriptExecution};
pub use loaf::{keys, LoafAttribution, ScriptFieldPolicy};
pub use resolver::{resolve, resolve_with};
