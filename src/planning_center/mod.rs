//! Planning Center API integration.
//!
//! Provides the authenticated API client plus the data types used when
//! joining a plan's time slots to its agenda items.

/// API client for Planning Center Online requests
pub mod api;
/// Data types representing Planning Center resources
pub mod types;

// Re-export key components
pub use api::PlanningCenterClient;
pub use types::{PlanItem, ServiceTime, ServiceTimes};
