//! Deterministic, human-friendly slug derivation.
//!
//! Bridges ASCII slugification (`slug` crate) with Chinese transliteration
//! (`pinyin` crate) so titles like “基线对齐” become `ji-xian-dui-qi`. There
//! is deliberately no uniqueness suffixing here: two posts resolving to the
//! same (date, slug) key is an authoring mistake the store surfaces, never
//! something to paper over with `-2`.

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("explicit slug override `{input}` is not in slug form")]
    InvalidOverride { input: String },
}

/// Derive a slug from human-readable text such as a post title.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Validate an author-supplied `slug:` override.
///
/// Overrides are taken verbatim into URLs, so they must already be in slug
/// form rather than getting silently rewritten behind the author's back.
pub fn validate_override(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }
    if slugify(input) != input {
        return Err(SlugError::InvalidOverride {
            input: input.to_string(),
        });
    }
    Ok(input.to_string())
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => {
                // Preserve unhandled characters so slugify can decide how to filter them.
                output.push(ch);
            }
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_transliterates_chinese() {
        let slug = derive_slug("C++ 中的虚函数").expect("slug");
        assert_eq!(slug, "c-zhong-de-xu-han-shu");
    }

    #[test]
    fn derive_slug_rejects_empty_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn override_must_already_be_slugified() {
        assert_eq!(
            validate_override("memory-layout"),
            Ok("memory-layout".to_string())
        );
        assert_eq!(
            validate_override("Memory Layout"),
            Err(SlugError::InvalidOverride {
                input: "Memory Layout".to_string()
            })
        );
    }
}
