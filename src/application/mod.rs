//! Application layer: operations composed on top of the store for the CLI
//! and for downstream tooling.

pub mod archive;
pub mod error;
