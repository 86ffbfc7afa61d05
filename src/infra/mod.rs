//! Process-level plumbing: logging installation and infrastructure errors.

pub mod error;
pub mod telemetry;
