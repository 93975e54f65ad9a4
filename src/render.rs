//! Schedule renderers.
//!
//! Two mutually exclusive output modes: pretty-printed JSON mirroring the
//! schedule structure, or flat indented text.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::schedule::ScheduleSlot;

/// Wire shape for JSON output: `{"plan": [...]}`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    plan: &'a [ScheduleSlot],
}

/// Render the schedule as pretty-printed JSON.
pub fn render_json(schedule: &[ScheduleSlot]) -> Result<String> {
    serde_json::to_string_pretty(&JsonOutput { plan: schedule })
        .map_err(|e| Error::Decode(format!("Failed to serialize schedule: {e}")))
}

/// Render the schedule as plain text: one line per time-slot label, one
/// line per item, a blank line between slots, trailing whitespace trimmed.
pub fn render_text(schedule: &[ScheduleSlot]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for slot in schedule {
        lines.push(slot.time.clone());
        for item in &slot.items {
            let title = item.title.as_deref().unwrap_or("Untitled");
            let length = item
                .length
                .map_or_else(|| String::from("unknown length"), |n| format!("{n} seconds"));
            lines.push(format!("{}: {title} - {length}", item.sequence));
        }
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}
