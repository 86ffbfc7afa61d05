//! Front-matter header parsing and re-serialization.
//!
//! Every article begins with a `---` delimited block of `key: value` pairs.
//! Lists are written inline (`tags: [c, memory]`) or as indented `- item`
//! blocks. Keys this core does not recognise are preserved verbatim so that
//! export and migration tooling can reproduce an equivalent header.

use serde::Serialize;
use thiserror::Error;
use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

pub const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const DELIMITER: &str = "---";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("document does not start with a `---` front-matter delimiter")]
    Missing,
    #[error("front-matter block is never closed by a `---` delimiter")]
    Unterminated,
    #[error("line {line}: expected `key: value`, found `{text}`")]
    Syntax { line: usize, text: String },
    #[error("line {line}: list item outside of a list key")]
    DanglingListItem { line: usize },
}

/// A publication timestamp as written by the author.
///
/// Headers carry either a full `YYYY-MM-DD HH:MM:SS` timestamp or a bare
/// date; the distinction is kept so re-serialization reproduces the value the
/// author wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PublicationDate {
    pub datetime: PrimitiveDateTime,
    pub date_only: bool,
}

impl PublicationDate {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(datetime) = PrimitiveDateTime::parse(raw, DATE_TIME_FORMAT) {
            return Some(Self {
                datetime,
                date_only: false,
            });
        }
        Date::parse(raw, DATE_FORMAT).ok().map(|date| Self {
            datetime: date.midnight(),
            date_only: true,
        })
    }

    pub fn date(&self) -> Date {
        self.datetime.date()
    }

    pub fn render(&self) -> String {
        let format = if self.date_only {
            DATE_FORMAT
        } else {
            DATE_TIME_FORMAT
        };
        // The formats above cannot fail for in-range dates.
        self.datetime
            .format(format)
            .unwrap_or_else(|_| self.datetime.to_string())
    }
}

/// Parsed metadata header. Raw values are kept as written; typed reads and
/// invariant checks live in [`crate::domain::validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date_raw: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub comments: Option<String>,
    pub draft: Option<String>,
    pub published: Option<String>,
    /// Unrecognised keys, in authoring order.
    pub extra: Vec<(String, String)>,
}

impl FrontMatter {
    /// Publication timestamp, when the `date` value parses.
    pub fn date(&self) -> Option<PublicationDate> {
        self.date_raw
            .as_deref()
            .and_then(|raw| PublicationDate::parse(raw))
    }

    /// Resolve the `comments` flag against the site-wide default. An
    /// unparseable value also falls back to the default; validation reports
    /// it separately.
    pub fn comments_enabled(&self, default: bool) -> bool {
        self.comments
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(default)
    }

    pub fn draft_marker(&self) -> bool {
        self.draft.as_deref().and_then(parse_bool) == Some(true)
    }

    pub fn retraction_marker(&self) -> bool {
        self.published.as_deref().and_then(parse_bool) == Some(false)
    }

    /// Re-serialize into a header equivalent to the parsed one: same keys,
    /// same values, canonical ordering and whitespace.
    pub fn to_header(&self) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');

        let scalars: [(&str, Option<&str>); 6] = [
            ("title", self.title.as_deref()),
            ("date", self.date_raw.as_deref()),
            ("slug", self.slug.as_deref()),
            ("author", self.author.as_deref()),
            ("comments", self.comments.as_deref()),
            ("draft", self.draft.as_deref()),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                push_scalar(&mut out, key, value);
            }
        }
        push_list(&mut out, "categories", &self.categories);
        push_list(&mut out, "tags", &self.tags);
        if let Some(value) = self.published.as_deref() {
            push_scalar(&mut out, "published", value);
        }
        for (key, value) in &self.extra {
            push_scalar(&mut out, key, value);
        }

        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

fn push_scalar(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push(':');
    if !value.is_empty() {
        out.push(' ');
        out.push_str(value);
    }
    out.push('\n');
}

fn push_list(out: &mut String, key: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    out.push_str(key);
    out.push_str(":\n");
    for value in values {
        out.push_str("  - ");
        out.push_str(value);
        out.push('\n');
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Split a document into its raw header lines and body text.
///
/// The body is returned as written, fences and all; this layer only locates
/// the delimiters.
pub fn split_document(contents: &str) -> Result<(Vec<String>, String), FrontMatterError> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut lines = contents.lines();

    match lines.next() {
        Some(line) if line.trim_end() == DELIMITER => {}
        _ => return Err(FrontMatterError::Missing),
    }

    let mut header = Vec::new();
    for line in lines.by_ref() {
        if line.trim_end() == DELIMITER {
            let body: String = lines.collect::<Vec<_>>().join("\n");
            return Ok((header, body));
        }
        header.push(line.to_string());
    }

    Err(FrontMatterError::Unterminated)
}

/// Parse a whole document into front matter and body.
pub fn parse_document(contents: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let (header, body) = split_document(contents)?;
    let front_matter = parse_header(&header)?;
    Ok((front_matter, body))
}

fn parse_header(lines: &[String]) -> Result<FrontMatter, FrontMatterError> {
    let mut fm = FrontMatter::default();
    // Key currently accepting `- item` continuation lines.
    let mut open_list: Option<ListKey> = None;

    for (index, raw_line) in lines.iter().enumerate() {
        let line_no = index + 2; // account for the opening delimiter
        let line = raw_line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if let Some(item) = list_item(line) {
            let Some(key) = open_list else {
                return Err(FrontMatterError::DanglingListItem { line: line_no });
            };
            match key {
                ListKey::Categories => fm.categories.push(item),
                ListKey::Tags => fm.tags.push(item),
                // Unknown list keys are kept as an opaque comma-joined value.
                ListKey::Extra(index) => {
                    let value = &mut fm.extra[index].1;
                    if !value.is_empty() {
                        value.push_str(", ");
                    }
                    value.push_str(&item);
                }
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(FrontMatterError::Syntax {
                line: line_no,
                text: line.to_string(),
            });
        };
        let key = key.trim();
        let value = unquote(value.trim());
        open_list = None;

        match key {
            "title" => fm.title = Some(value),
            "date" => fm.date_raw = Some(value),
            "slug" => fm.slug = Some(value),
            "author" => fm.author = Some(value),
            "comments" => fm.comments = Some(value),
            "draft" => fm.draft = Some(value),
            "published" => fm.published = Some(value),
            "categories" => {
                if value.is_empty() {
                    open_list = Some(ListKey::Categories);
                } else {
                    fm.categories = inline_list(&value);
                }
            }
            "tags" => {
                if value.is_empty() {
                    open_list = Some(ListKey::Tags);
                } else {
                    fm.tags = inline_list(&value);
                }
            }
            _ => {
                let opens_list = value.is_empty();
                fm.extra.push((key.to_string(), value));
                if opens_list {
                    open_list = Some(ListKey::Extra(fm.extra.len() - 1));
                }
            }
        }
    }

    Ok(fm)
}

#[derive(Clone, Copy)]
enum ListKey {
    Categories,
    Tags,
    Extra(usize),
}

fn list_item(line: &str) -> Option<String> {
    let indented = line.starts_with([' ', '\t']);
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('-')?;
    if !indented && !(rest.starts_with(' ') || rest.is_empty()) {
        return None;
    }
    Some(unquote(rest.trim()))
}

fn inline_list(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(value);
    inner
        .split(',')
        .map(|part| unquote(part.trim()))
        .filter(|part| !part.is_empty())
        .collect()
}

fn unquote(value: &str) -> String {
    let stripped = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            value
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })
        .unwrap_or(value);
    stripped.to_string()
}
