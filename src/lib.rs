//! Quaderno: a file-backed post corpus core for static technical blogs.
//!
//! Articles live as Markdown files whose names encode a `(date, slug)`
//! address and whose contents begin with a key-value front-matter header.
//! The crate scans that namespace into a read-only [`store::Catalog`],
//! validates every publication invariant, and hands well-formed posts to an
//! external site renderer. It never renders, templates, or deploys.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod store;
