//! `planorder` - `Planning Center` order-of-service CLI.
//!
//! Fetches the first plan after a given date from `Planning Center`
//! Online, joins its service time slots to their agenda items, and
//! renders the resulting order of service as text or JSON.

// Re-export public modules for use in integration tests and as a library
pub mod cli;
pub mod config;
pub mod error;
pub mod planning_center;
pub mod render;
pub mod schedule;
