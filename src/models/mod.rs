//! Data models for the lead tracker.
//!
//! Field names serialize in camelCase to match the dashboard client.

mod filter;
mod lead;
mod stats;

pub use filter::*;
pub use lead::*;
pub use stats::*;
