//! The post record store: a read-only scan over a hierarchical file
//! namespace, producing an in-memory catalog with deterministic listings and
//! (date, slug) lookup.
//!
//! The store never writes. Files are authored and retired by hand; every
//! scan re-derives each post's lifecycle state from scratch.

mod catalog;
mod scan;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::post::PostKey;

pub use catalog::{Catalog, LabelCount};
pub use scan::{FileDiagnostic, PostStore, ScanIssue};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store root `{path}` is not a readable directory")]
    RootUnreadable { path: PathBuf },
    #[error("no post at `{key}`")]
    NotFound { key: PostKey },
}
