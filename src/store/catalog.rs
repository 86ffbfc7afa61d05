//! In-memory catalog produced by a store scan.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::post::{ListFilter, PostKey, PostRecord, PostSummary, listing_order};
use crate::domain::types::PostStatus;

use super::{FileDiagnostic, StoreError};

/// Aggregated label (tag or category) with its published-post count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Snapshot of the store at scan time. Read-only; a fresh scan replaces it
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Vec<PostRecord>,
    diagnostics: Vec<FileDiagnostic>,
}

impl Catalog {
    pub(super) fn new(posts: Vec<PostRecord>, diagnostics: Vec<FileDiagnostic>) -> Self {
        Self { posts, diagnostics }
    }

    /// Published posts matching the filter, newest first, slug-ascending on
    /// date ties.
    pub fn list(&self, filter: &ListFilter) -> Vec<PostSummary> {
        let mut summaries: Vec<PostSummary> = self
            .posts
            .iter()
            .filter(|post| post.status.is_listed())
            .map(PostRecord::summary)
            .filter(|summary| filter.matches(summary))
            .collect();
        summaries.sort_by(listing_order);
        summaries
    }

    /// Look up any addressable post, retracted and draft ones included;
    /// exclusion from listings is not deletion.
    pub fn get(&self, key: &PostKey) -> Result<&PostRecord, StoreError> {
        self.posts
            .iter()
            .find(|post| &post.key == key)
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }

    /// Every record the scan could address, in scan order.
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Per-file scan problems: unreadable files, broken headers, invariant
    /// violations, duplicate addresses.
    pub fn diagnostics(&self) -> &[FileDiagnostic] {
        &self.diagnostics
    }

    pub fn count_by_status(&self, status: PostStatus) -> usize {
        self.posts
            .iter()
            .filter(|post| post.status == status)
            .count()
    }

    /// Tag labels across published posts with counts, alphabetical.
    pub fn tags(&self) -> Vec<LabelCount> {
        self.aggregate(|post| &post.tags)
    }

    /// Category labels across published posts with counts, alphabetical.
    pub fn categories(&self) -> Vec<LabelCount> {
        self.aggregate(|post| &post.categories)
    }

    fn aggregate<F>(&self, labels: F) -> Vec<LabelCount>
    where
        F: Fn(&PostRecord) -> &Vec<String>,
    {
        let mut map: BTreeMap<&str, usize> = BTreeMap::new();
        for post in self.posts.iter().filter(|post| post.status.is_listed()) {
            for label in labels(post) {
                *map.entry(label.as_str()).or_insert(0) += 1;
            }
        }
        map.into_iter()
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect()
    }
}
