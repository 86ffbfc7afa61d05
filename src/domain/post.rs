//! Post entity, addressing key, and listing types.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::domain::front_matter::{FrontMatter, PublicationDate};
use crate::domain::types::PostStatus;

pub const HUMAN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const KEY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// The unique address of a post: the calendar date its filename carries plus
/// its slug. This pair is the canonical URL path segment downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostKey {
    pub date: Date,
    pub slug: String,
}

impl PostKey {
    pub fn new(date: Date, slug: impl Into<String>) -> Self {
        Self {
            date,
            slug: slug.into(),
        }
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .date
            .format(KEY_DATE_FORMAT)
            .unwrap_or_else(|_| self.date.to_string());
        write!(f, "{date}/{}", self.slug)
    }
}

/// A fully loaded post. Only ever constructed by the store scan; mutation
/// happens through direct file authoring, never through this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub key: PostKey,
    pub title: String,
    pub published_at: PublicationDate,
    /// Ordered as authored; drives display grouping downstream.
    pub categories: Vec<String>,
    /// De-duplicated by value, first occurrence wins.
    pub tags: Vec<String>,
    pub author: String,
    pub comments_enabled: bool,
    pub status: PostStatus,
    pub contains_code: bool,
    pub contains_diagram: bool,
    /// Path relative to the store root, for diagnostics and export.
    pub source_path: PathBuf,
    pub body: String,
    #[serde(skip)]
    pub front_matter: FrontMatter,
}

impl PostRecord {
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            key: self.key.clone(),
            title: self.title.clone(),
            published_at: self.published_at,
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            contains_code: self.contains_code,
            contains_diagram: self.contains_diagram,
        }
    }

}

/// What `list` hands out: enough for an index page, no body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub key: PostKey,
    pub title: String,
    pub published_at: PublicationDate,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub contains_code: bool,
    pub contains_diagram: bool,
}

/// Listing filter: all criteria present must match.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub since: Option<Date>,
    pub until: Option<Date>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none() && self.since.is_none() && self.until.is_none()
    }

    pub fn matches(&self, summary: &PostSummary) -> bool {
        if let Some(category) = self.category.as_deref() {
            if !summary.categories.iter().any(|c| c == category) {
                return false;
            }
        }
        if let Some(tag) = self.tag.as_deref() {
            if !summary.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if summary.key.date < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if summary.key.date > until {
                return false;
            }
        }
        true
    }
}

/// Canonical listing order: newest first, ties broken by slug ascending so
/// repeated scans always agree.
pub fn listing_order(a: &PostSummary, b: &PostSummary) -> Ordering {
    b.published_at
        .datetime
        .cmp(&a.published_at.datetime)
        .then_with(|| a.key.slug.cmp(&b.key.slug))
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn summary(date: Date, slug: &str) -> PostSummary {
        PostSummary {
            key: PostKey::new(date, slug),
            title: slug.to_string(),
            published_at: PublicationDate {
                datetime: date.midnight(),
                date_only: true,
            },
            categories: vec!["Operating System".to_string()],
            tags: vec!["kernel".to_string()],
            author: "xfy".to_string(),
            contains_code: false,
            contains_diagram: false,
        }
    }

    #[test]
    fn listing_order_is_newest_first_then_slug() {
        let mut posts = vec![
            summary(date!(2025 - 05 - 25), "older"),
            summary(date!(2025 - 07 - 10), "newest"),
            summary(date!(2025 - 06 - 02), "b-middle"),
            summary(date!(2025 - 06 - 02), "a-middle"),
        ];
        posts.sort_by(listing_order);

        let slugs: Vec<_> = posts.iter().map(|p| p.key.slug.as_str()).collect();
        assert_eq!(slugs, ["newest", "a-middle", "b-middle", "older"]);
    }

    #[test]
    fn filter_matches_category_tag_and_range() {
        let post = summary(date!(2025 - 06 - 02), "entry");

        let by_category = ListFilter {
            category: Some("Operating System".to_string()),
            ..Default::default()
        };
        assert!(by_category.matches(&post));

        let wrong_tag = ListFilter {
            tag: Some("c++".to_string()),
            ..Default::default()
        };
        assert!(!wrong_tag.matches(&post));

        let in_range = ListFilter {
            since: Some(date!(2025 - 06 - 01)),
            until: Some(date!(2025 - 06 - 30)),
            ..Default::default()
        };
        assert!(in_range.matches(&post));

        let before_range = ListFilter {
            since: Some(date!(2025 - 07 - 01)),
            ..Default::default()
        };
        assert!(!before_range.matches(&post));
    }

    #[test]
    fn key_display_is_date_slash_slug() {
        let key = PostKey::new(date!(2025 - 05 - 25), "paging");
        assert_eq!(key.to_string(), "2025-05-25/paging");
    }

    #[test]
    fn human_date_format_matches_site_convention() {
        assert_eq!(format_human_date(date!(2025 - 05 - 25)), "May 25, 2025");
    }
}
