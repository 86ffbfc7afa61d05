//! Directory scan: files in, catalog out.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use time::Date;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::front_matter::{self, FrontMatter, FrontMatterError, PublicationDate};
use crate::domain::markup;
use crate::domain::post::{KEY_DATE_FORMAT, PostKey, PostRecord};
use crate::domain::slug;
use crate::domain::types::PostStatus;
use crate::domain::validate::{self, PostCandidate, ValidationReport};

use super::{Catalog, StoreError};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Scan-time problem attached to a single file. Never fatal: the scan keeps
/// serving everything that is valid.
#[derive(Debug, Clone)]
pub struct FileDiagnostic {
    /// Path relative to the store root.
    pub path: PathBuf,
    pub issue: ScanIssue,
}

#[derive(Debug, Clone)]
pub enum ScanIssue {
    Unreadable { message: String },
    FrontMatter(FrontMatterError),
    Validation(ValidationReport),
    DuplicateKey { key: PostKey, paths: Vec<PathBuf> },
}

impl std::fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanIssue::Unreadable { message } => write!(f, "unreadable: {message}"),
            ScanIssue::FrontMatter(err) => write!(f, "front matter: {err}"),
            ScanIssue::Validation(report) => write!(f, "{report}"),
            ScanIssue::DuplicateKey { key, paths } => {
                write!(f, "duplicate address `{key}` also claimed by ")?;
                let others: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "{}", others.join(", "))
            }
        }
    }
}

/// The authoritative post collection, rooted at one directory.
#[derive(Debug, Clone)]
pub struct PostStore {
    root: PathBuf,
    default_author: String,
    comments_default: bool,
}

impl PostStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_author: "anonymous".to_string(),
            comments_default: true,
        }
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn with_comments_default(mut self, enabled: bool) -> Self {
        self.comments_default = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and build a catalog.
    ///
    /// Fails only when the root itself is unusable; every per-file problem
    /// becomes a [`FileDiagnostic`] and the rest of the corpus still loads.
    pub fn scan(&self) -> Result<Catalog, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::RootUnreadable {
                path: self.root.clone(),
            });
        }

        let mut posts: Vec<PostRecord> = Vec::new();
        let mut diagnostics: Vec<FileDiagnostic> = Vec::new();

        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !has_markdown_extension(entry.path()) {
                continue;
            }

            let rel_path = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();

            match self.load_file(entry.path(), &rel_path) {
                Ok((record, report)) => {
                    if !report.is_ok() {
                        diagnostics.push(FileDiagnostic {
                            path: rel_path,
                            issue: ScanIssue::Validation(report),
                        });
                    }
                    if let Some(record) = record {
                        posts.push(record);
                    }
                }
                Err(issue) => diagnostics.push(FileDiagnostic {
                    path: rel_path,
                    issue,
                }),
            }
        }

        exclude_duplicates(&mut posts, &mut diagnostics);

        debug!(
            posts = posts.len(),
            diagnostics = diagnostics.len(),
            root = %self.root.display(),
            "store scan complete"
        );

        Ok(Catalog::new(posts, diagnostics))
    }

    /// Parse and validate one file.
    ///
    /// Returns the record (when the file is addressable at all) together with
    /// its validation report; a record with violations or an explicit marker
    /// is carried as `Draft`/`Retracted` rather than dropped.
    fn load_file(
        &self,
        abs_path: &Path,
        rel_path: &Path,
    ) -> Result<(Option<PostRecord>, ValidationReport), ScanIssue> {
        let contents = fs::read_to_string(abs_path).map_err(|err| ScanIssue::Unreadable {
            message: err.to_string(),
        })?;

        let (front_matter, body) =
            front_matter::parse_document(&contents).map_err(ScanIssue::FrontMatter)?;

        let file_key = file_stem_key(rel_path);
        let (file_date, file_slug) = match file_key.as_ref() {
            Some((date, slug)) => (Some(*date), slug.as_deref()),
            None => (None, None),
        };
        let body_scan = markup::scan_body(&body);
        let report = validate::validate(&PostCandidate {
            file_date,
            file_slug,
            front_matter: &front_matter,
            body_scan: &body_scan,
        });

        let Some(key) = self.resolve_key(&front_matter, file_key.as_ref()) else {
            // Without an address the file cannot even be a draft.
            return Ok((None, report));
        };

        let status = classify(&front_matter, &report);
        let published_at = front_matter.date().unwrap_or(PublicationDate {
            datetime: key.date.midnight(),
            date_only: true,
        });

        let record = PostRecord {
            title: front_matter.title.clone().unwrap_or_default(),
            published_at,
            categories: front_matter.categories.clone(),
            tags: dedup_tags(&front_matter.tags),
            author: front_matter
                .author
                .clone()
                .unwrap_or_else(|| self.default_author.clone()),
            comments_enabled: front_matter.comments_enabled(self.comments_default),
            status,
            contains_code: body_scan.contains_code,
            contains_diagram: body_scan.contains_diagram,
            source_path: rel_path.to_path_buf(),
            body,
            front_matter,
            key,
        };

        Ok((Some(record), report))
    }

    /// The addressing key: filename date plus the slug. An explicit
    /// well-formed `slug:` override beats the filename-derived one; a
    /// date-only filename falls back to the title-derived slug.
    fn resolve_key(
        &self,
        front_matter: &FrontMatter,
        file_key: Option<&(Date, Option<String>)>,
    ) -> Option<PostKey> {
        let (date, file_slug) = file_key?;
        let slug = front_matter
            .slug
            .as_deref()
            .and_then(|raw| slug::validate_override(raw).ok())
            .or_else(|| file_slug.clone())
            .or_else(|| {
                front_matter
                    .title
                    .as_deref()
                    .and_then(|title| slug::derive_slug(title).ok())
            })?;
        Some(PostKey::new(*date, slug))
    }
}

/// Status re-derived on every scan: explicit markers first, then validation.
fn classify(front_matter: &FrontMatter, report: &ValidationReport) -> PostStatus {
    if front_matter.draft_marker() {
        PostStatus::Draft
    } else if front_matter.retraction_marker() {
        PostStatus::Retracted
    } else if report.is_ok() {
        PostStatus::Published
    } else {
        PostStatus::Draft
    }
}

/// Parse `YYYY-MM-DD-slug` (or a bare `YYYY-MM-DD`) out of a file stem.
fn file_stem_key(rel_path: &Path) -> Option<(Date, Option<String>)> {
    let stem = rel_path.file_stem()?.to_str()?;
    if stem.len() < 10 || !stem.is_char_boundary(10) {
        return None;
    }
    let date = Date::parse(&stem[..10], KEY_DATE_FORMAT).ok()?;
    match stem[10..].strip_prefix('-') {
        None if stem.len() == 10 => Some((date, None)),
        None => None,
        Some("") => Some((date, None)),
        Some(slug) => Some((date, Some(slug.to_string()))),
    }
}

/// Uniqueness by value, first occurrence wins; duplicate values are already
/// reported by validation.
fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        if !tag.trim().is_empty() && !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

/// Drop every post involved in a key collision and record one diagnostic per
/// affected file. Guessing a winner would hide a real authoring mistake.
fn exclude_duplicates(posts: &mut Vec<PostRecord>, diagnostics: &mut Vec<FileDiagnostic>) {
    let mut by_key: HashMap<PostKey, Vec<PathBuf>> = HashMap::new();
    for post in posts.iter() {
        by_key
            .entry(post.key.clone())
            .or_default()
            .push(post.source_path.clone());
    }
    by_key.retain(|_, paths| paths.len() > 1);
    if by_key.is_empty() {
        return;
    }

    for (key, paths) in &by_key {
        warn!(key = %key, files = paths.len(), "duplicate post address; excluding all claimants");
        for path in paths {
            let others: Vec<PathBuf> = paths.iter().filter(|p| *p != path).cloned().collect();
            diagnostics.push(FileDiagnostic {
                path: path.clone(),
                issue: ScanIssue::DuplicateKey {
                    key: key.clone(),
                    paths: others,
                },
            });
        }
    }

    posts.retain(|post| !by_key.contains_key(&post.key));
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') && name.len() > 1)
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
