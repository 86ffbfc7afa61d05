//! TOML export of the whole catalog.
//!
//! The archive is what migration tooling consumes: each post carries its
//! re-serialized metadata header, so exporting and re-importing a corpus
//! reproduces equivalent front matter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::domain::types::PostStatus;
use crate::store::Catalog;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to serialize archive")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write archive to `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct Archive {
    posts: Vec<ArchivedPost>,
}

#[derive(Debug, Serialize)]
struct ArchivedPost {
    path: PathBuf,
    date: String,
    slug: String,
    status: PostStatus,
    /// The `---` delimited header, re-serialized from the parsed form.
    front_matter: String,
    body: String,
}

/// Render every addressable post (drafts and retracted ones included) as a
/// TOML document.
pub fn to_toml_string(catalog: &Catalog) -> Result<String, ArchiveError> {
    let posts = catalog
        .posts()
        .iter()
        .map(|post| ArchivedPost {
            path: post.source_path.clone(),
            date: post.key.date.to_string(),
            slug: post.key.slug.clone(),
            status: post.status,
            front_matter: post.front_matter.to_header(),
            body: post.body.clone(),
        })
        .collect();

    Ok(toml::to_string_pretty(&Archive { posts })?)
}

pub fn write_archive(catalog: &Catalog, path: &Path) -> Result<(), ArchiveError> {
    let rendered = to_toml_string(catalog)?;
    fs::write(path, rendered).map_err(|source| ArchiveError::Write {
        path: path.to_path_buf(),
        source,
    })
}
