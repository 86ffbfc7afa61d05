//! Shared domain enumerations.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a post, re-derived on every store scan.
///
/// `Draft` covers both an explicit `draft: true` marker and any post whose
/// metadata cannot yet satisfy the publication invariants (missing or invalid
/// `date`, empty title, malformed body). `Retracted` posts carry
/// `published: false`: they stay addressable by key but are excluded from
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
    Retracted,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Retracted => "retracted",
        }
    }

    /// Whether posts in this state appear in public listings.
    pub fn is_listed(self) -> bool {
        matches!(self, PostStatus::Published)
    }
}

impl TryFrom<&str> for PostStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "retracted" => Ok(PostStatus::Retracted),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            PostStatus::Draft,
            PostStatus::Published,
            PostStatus::Retracted,
        ] {
            assert_eq!(PostStatus::try_from(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn only_published_posts_are_listed() {
        assert!(PostStatus::Published.is_listed());
        assert!(!PostStatus::Draft.is_listed());
        assert!(!PostStatus::Retracted.is_listed());
    }
}
