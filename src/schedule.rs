//! Core schedule logic: time-slot filtering, the item join, timestamp
//! normalization, and final assembly.
//!
//! Each stage is permissive at the record level — structurally malformed
//! entries are skipped silently — while any failed detail fetch aborts the
//! whole run. The retained time-slot set is built once and never mutated
//! afterwards.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::planning_center::{PlanItem, PlanningCenterClient, ServiceTimes};

/// Timezone every displayed timestamp is normalized to.
pub const DISPLAY_ZONE: Tz = chrono_tz::America::Chicago;

/// One time slot in the final schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSlot {
    /// Display label, e.g. "9:00 AM", or the raw timestamp when unparseable.
    pub time: String,
    /// Agenda items in renumbered order.
    pub items: Vec<ScheduleItem>,
}

/// One agenda item in the final schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleItem {
    /// Item title, if any.
    pub title: Option<String>,
    /// Dense 1-based position within the slot; original sequence values
    /// are discarded.
    pub sequence: usize,
    /// Duration in seconds, if any.
    pub length: Option<i64>,
}

/// Extract the retained service time slots from a plan-times response.
///
/// Keeps entries of kind "service" that carry a string ID and start
/// timestamp; anything else is skipped silently. Stored timestamps are
/// normalized to [`DISPLAY_ZONE`], falling back to the raw value when
/// normalization fails.
pub fn collect_service_times(payload: &Value) -> ServiceTimes {
    let mut times = ServiceTimes::default();
    let Some(entries) = payload["data"].as_array() else {
        return times;
    };

    for entry in entries {
        let attributes = &entry["attributes"];
        if attributes["time_type"].as_str() != Some("service") {
            continue;
        }
        let (Some(id), Some(starts_at)) = (entry["id"].as_str(), attributes["starts_at"].as_str())
        else {
            continue;
        };

        let stored = normalize_starts_at(starts_at).unwrap_or_else(|| starts_at.to_string());
        times.insert(id.to_string(), stored);
    }

    times
}

/// Convert an ISO-8601 timestamp to [`DISPLAY_ZONE`].
///
/// Timestamps without an explicit offset are treated as UTC. Returns
/// `None` when the value cannot be parsed; the caller keeps the raw
/// string in that case.
pub fn normalize_starts_at(timestamp: &str) -> Option<String> {
    let parsed = parse_timestamp(timestamp)?;
    Some(parsed.with_timezone(&DISPLAY_ZONE).to_rfc3339())
}

/// Parse an ISO-8601 timestamp, tolerating both the offset-included and
/// offset-free forms. Offset-free values are assumed to be UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Join agenda items to their owning time slots.
///
/// For every item-time reference, one detail record is fetched (strictly
/// sequentially) to resolve the owning time-slot ID. References whose
/// slot was filtered out are dropped; when no service slots were retained
/// at all, the membership filter is bypassed and every slot ID is
/// accepted. Items with multiple references fan out to multiple slots.
///
/// Any detail fetch failure aborts the whole run.
pub async fn join_items_by_time(
    client: &PlanningCenterClient,
    payload: &Value,
    times: &ServiceTimes,
) -> Result<HashMap<String, Vec<PlanItem>>> {
    let mut by_time: HashMap<String, Vec<PlanItem>> = HashMap::new();
    let Some(items) = payload["data"].as_array() else {
        return Ok(by_time);
    };

    for item in items {
        let item_times = &item["relationships"]["item_times"];
        let Some(refs) = item_times["data"].as_array().filter(|refs| !refs.is_empty()) else {
            continue;
        };
        let Some(related_url) = item_times["links"]["related"].as_str() else {
            continue;
        };

        for item_time_ref in refs {
            let Some(item_time_id) = item_time_ref["id"].as_str() else {
                continue;
            };

            let detail = client.fetch_item_time(related_url, item_time_id).await?;
            let Some(plan_time_id) =
                detail["data"]["relationships"]["plan_time"]["data"]["id"].as_str()
            else {
                continue;
            };

            if !times.is_empty() && !times.contains(plan_time_id) {
                continue;
            }

            let attributes = &item["attributes"];
            by_time.entry(plan_time_id.to_string()).or_default().push(PlanItem {
                item_id: item["id"].as_str().unwrap_or_default().to_string(),
                item_time_id: item_time_id.to_string(),
                title: attributes["title"].as_str().map(String::from),
                sequence: attributes.get("sequence").filter(|v| !v.is_null()).cloned(),
                length: attributes["length"].as_i64(),
            });
        }
    }

    Ok(by_time)
}

/// Assemble the final schedule from the retained time slots and the
/// joined items.
///
/// Slots with no joined items are dropped. Within a slot, items are
/// stable-sorted by sequence (undefined sequences after all defined ones)
/// and renumbered densely from 1. Slots sort chronologically; slots whose
/// timestamp cannot be parsed group at the end, tie-broken by label text.
pub fn build_schedule(
    times: &ServiceTimes,
    mut items_by_time: HashMap<String, Vec<PlanItem>>,
) -> Vec<ScheduleSlot> {
    let mut slots: Vec<(Option<DateTime<FixedOffset>>, String, Vec<ScheduleItem>)> = Vec::new();

    for entry in times.iter() {
        let Some(mut items) = items_by_time.remove(&entry.id) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }

        items.sort_by_key(sequence_sort_key);
        let renumbered = items
            .iter()
            .enumerate()
            .map(|(index, item)| ScheduleItem {
                title: item.title.clone(),
                sequence: index + 1,
                length: item.length,
            })
            .collect();

        let (sort_time, label) = format_time_label(&entry.starts_at);
        slots.push((sort_time, label, renumbered));
    }

    slots.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(x), Some(y)) => x.cmp(y).then_with(|| a.1.cmp(&b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(&b.1),
    });

    slots
        .into_iter()
        .map(|(_, time, items)| ScheduleSlot { time, items })
        .collect()
}

/// Parse a stored timestamp for sorting and build its display label.
///
/// Parseable timestamps format as a 12-hour clock time with the leading
/// zero stripped ("9:00 AM"); unparseable ones keep the stored string as
/// the label and sort last.
fn format_time_label(stored: &str) -> (Option<DateTime<FixedOffset>>, String) {
    parse_timestamp(stored).map_or_else(
        || (None, stored.to_string()),
        |parsed| (Some(parsed), parsed.format("%-I:%M %p").to_string()),
    )
}

/// Sort key for item sequences: integers and integral numeric strings
/// sort ascending, everything else sorts after them in arrival order.
fn sequence_sort_key(item: &PlanItem) -> (bool, i64) {
    let parsed = item.sequence.as_ref().and_then(|value| {
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
    });
    parsed.map_or((true, i64::MAX), |sequence| (false, sequence))
}
