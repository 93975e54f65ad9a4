//! Planning Center data types.
//!
//! These types represent the data structures carried between the fetch,
//! join, and assembly stages of a single run.

use serde_json::Value;

/// A retained "service" time slot on a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTime {
    /// Opaque time-slot identifier from the API.
    pub id: String,
    /// Start timestamp, normalized to the display timezone when parseable,
    /// otherwise the raw API value.
    pub starts_at: String,
}

/// The retained set of service time slots for a plan.
///
/// Preserves arrival order, which downstream sorting relies on for stable
/// tie-breaks. Immutable once the fetch stage has built it.
#[derive(Debug, Clone, Default)]
pub struct ServiceTimes {
    entries: Vec<ServiceTime>,
}

impl ServiceTimes {
    /// Record a time slot, replacing the stored timestamp if the ID was
    /// already seen (the API should not repeat IDs, but the last entry wins).
    pub fn insert(&mut self, id: String, starts_at: String) {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.id == id) {
            existing.starts_at = starts_at;
        } else {
            self.entries.push(ServiceTime { id, starts_at });
        }
    }

    /// Whether the given time-slot ID was retained.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Whether no service time slots were retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of retained time slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the retained time slots in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceTime> {
        self.entries.iter()
    }
}

/// An agenda item joined to a time slot, before assembly.
///
/// `sequence` keeps the raw JSON value (integer, numeric string, or
/// absent); the assembly stage interprets it and discards it in favor of
/// a dense renumbering.
#[derive(Debug, Clone)]
pub struct PlanItem {
    /// Opaque agenda-item identifier.
    pub item_id: String,
    /// Identifier of the item-time detail record that produced this join.
    pub item_time_id: String,
    /// Item title, if any.
    pub title: Option<String>,
    /// Raw sequence value as received from the API.
    pub sequence: Option<Value>,
    /// Duration in seconds, if any.
    pub length: Option<i64>,
}
