//! Per-post invariant validation.
//!
//! `validate` checks every rule and reports every violation it finds, in
//! check order, so an author fixes a file in one pass instead of replaying
//! the first error repeatedly. Store-level rules (key uniqueness) live in the
//! scan, not here.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;
use time::Date;

use crate::domain::front_matter::{FrontMatter, parse_bool};
use crate::domain::markup::BodyScan;
use crate::domain::slug::{self, SlugError};

/// One broken invariant on a single post.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("title is missing or empty")]
    MissingTitle,
    #[error("`date` field is missing")]
    MissingDate,
    #[error("`date` value `{raw}` is not a valid timestamp")]
    InvalidDate { raw: String },
    #[error("`date` ({header}) disagrees with the filename date ({filename})")]
    DateMismatch { header: String, filename: String },
    #[error("filename does not encode a `YYYY-MM-DD-slug` address")]
    UnaddressableFilename,
    #[error("category #{index} is empty")]
    EmptyCategory { index: usize },
    #[error("tag #{index} is empty")]
    EmptyTag { index: usize },
    #[error("tag `{value}` appears more than once")]
    DuplicateTag { value: String },
    #[error("slug: {source}")]
    Slug {
        #[from]
        source: SlugError,
    },
    #[error("`{key}` value `{raw}` is not `true` or `false`")]
    InvalidFlag { key: &'static str, raw: String },
    #[error("fenced block opened on body line {line} is never closed")]
    UnterminatedFence { line: usize },
}

/// Everything the scan knows about one file before it becomes a record.
#[derive(Debug, Clone)]
pub struct PostCandidate<'a> {
    /// Date parsed from the filename, when the name conforms.
    pub file_date: Option<Date>,
    /// Slug carried by the filename; date-only names leave this empty and
    /// the slug is derived from the title instead.
    pub file_slug: Option<&'a str>,
    pub front_matter: &'a FrontMatter,
    pub body_scan: &'a BodyScan,
}

/// Ordered list of violations; empty means the post satisfies every
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "ok");
        }
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Check every authoring invariant on a candidate, collecting all violations.
pub fn validate(candidate: &PostCandidate<'_>) -> ValidationReport {
    let mut report = ValidationReport::default();
    let fm = candidate.front_matter;

    if fm.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        report.push(Violation::MissingTitle);
    }

    match fm.date_raw.as_deref() {
        None => report.push(Violation::MissingDate),
        Some(raw) => match fm.date() {
            None => report.push(Violation::InvalidDate {
                raw: raw.to_string(),
            }),
            Some(published) => {
                if let Some(file_date) = candidate.file_date {
                    if published.date() != file_date {
                        report.push(Violation::DateMismatch {
                            header: published.date().to_string(),
                            filename: file_date.to_string(),
                        });
                    }
                }
            }
        },
    }

    if candidate.file_date.is_none() {
        report.push(Violation::UnaddressableFilename);
    }

    for (index, category) in fm.categories.iter().enumerate() {
        if category.trim().is_empty() {
            report.push(Violation::EmptyCategory { index: index + 1 });
        }
    }

    let mut seen_tags = BTreeSet::new();
    for (index, tag) in fm.tags.iter().enumerate() {
        if tag.trim().is_empty() {
            report.push(Violation::EmptyTag { index: index + 1 });
        } else if !seen_tags.insert(tag.as_str()) {
            report.push(Violation::DuplicateTag { value: tag.clone() });
        }
    }

    match fm.slug.as_deref() {
        Some(raw) => {
            if let Err(source) = slug::validate_override(raw) {
                report.push(Violation::Slug { source });
            }
        }
        // A date-only filename must be able to derive its slug from the title.
        None if candidate.file_date.is_some() && candidate.file_slug.is_none() => {
            if let Err(source) = slug::derive_slug(fm.title.as_deref().unwrap_or_default()) {
                report.push(Violation::Slug { source });
            }
        }
        None => {}
    }

    for (key, raw) in [
        ("comments", fm.comments.as_deref()),
        ("draft", fm.draft.as_deref()),
        ("published", fm.published.as_deref()),
    ] {
        if let Some(raw) = raw {
            if parse_bool(raw).is_none() {
                report.push(Violation::InvalidFlag {
                    key,
                    raw: raw.to_string(),
                });
            }
        }
    }

    for line in &candidate.body_scan.unterminated_fences {
        report.push(Violation::UnterminatedFence { line: *line });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markup::scan_body;
    use time::macros::date;

    fn base_front_matter() -> FrontMatter {
        FrontMatter {
            title: Some("Paging on x86".to_string()),
            date_raw: Some("2025-05-25 10:00:00".to_string()),
            categories: vec!["Operating System".to_string()],
            tags: vec!["paging".to_string(), "x86".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn valid_candidate_passes() {
        let fm = base_front_matter();
        let scan = scan_body("plain body\n");
        let report = validate(&PostCandidate {
            file_date: Some(date!(2025 - 05 - 25)),
            file_slug: Some("paging-on-x86"),
            front_matter: &fm,
            body_scan: &scan,
        });
        assert!(report.is_ok(), "unexpected violations: {report}");
    }

    #[test]
    fn empty_title_always_fails() {
        for title in [None, Some(String::new()), Some("   ".to_string())] {
            let fm = FrontMatter {
                title,
                ..base_front_matter()
            };
            let scan = BodyScan::default();
            let report = validate(&PostCandidate {
                file_date: Some(date!(2025 - 05 - 25)),
                file_slug: Some("paging-on-x86"),
                front_matter: &fm,
                body_scan: &scan,
            });
            assert!(report.violations.contains(&Violation::MissingTitle));
        }
    }

    #[test]
    fn all_violations_are_reported_at_once() {
        let fm = FrontMatter {
            title: None,
            date_raw: Some("someday".to_string()),
            tags: vec!["dup".to_string(), "dup".to_string(), String::new()],
            comments: Some("maybe".to_string()),
            ..Default::default()
        };
        let scan = scan_body("```\nnever closed\n");
        let report = validate(&PostCandidate {
            file_date: None,
            file_slug: None,
            front_matter: &fm,
            body_scan: &scan,
        });

        assert_eq!(
            report.violations,
            vec![
                Violation::MissingTitle,
                Violation::InvalidDate {
                    raw: "someday".to_string()
                },
                Violation::UnaddressableFilename,
                Violation::DuplicateTag {
                    value: "dup".to_string()
                },
                Violation::EmptyTag { index: 3 },
                Violation::InvalidFlag {
                    key: "comments",
                    raw: "maybe".to_string()
                },
                Violation::UnterminatedFence { line: 1 },
            ]
        );
    }

    #[test]
    fn header_and_filename_dates_must_agree() {
        let fm = base_front_matter();
        let scan = BodyScan::default();
        let report = validate(&PostCandidate {
            file_date: Some(date!(2025 - 05 - 26)),
            file_slug: Some("paging-on-x86"),
            front_matter: &fm,
            body_scan: &scan,
        });
        assert_eq!(
            report.violations,
            vec![Violation::DateMismatch {
                header: "2025-05-25".to_string(),
                filename: "2025-05-26".to_string(),
            }]
        );
    }

    #[test]
    fn date_only_filename_derives_slug_from_title() {
        let fm = base_front_matter();
        let scan = BodyScan::default();
        let report = validate(&PostCandidate {
            file_date: Some(date!(2025 - 05 - 25)),
            file_slug: None,
            front_matter: &fm,
            body_scan: &scan,
        });
        assert!(report.is_ok(), "unexpected violations: {report}");
    }

    #[test]
    fn date_only_filename_without_derivable_title_is_flagged() {
        let fm = FrontMatter {
            title: Some("——".to_string()),
            date_raw: Some("2025-05-25".to_string()),
            ..Default::default()
        };
        let scan = BodyScan::default();
        let report = validate(&PostCandidate {
            file_date: Some(date!(2025 - 05 - 25)),
            file_slug: None,
            front_matter: &fm,
            body_scan: &scan,
        });
        assert_eq!(
            report.violations,
            vec![Violation::Slug {
                source: SlugError::Unrepresentable {
                    input: "——".to_string()
                }
            }]
        );
    }
}
