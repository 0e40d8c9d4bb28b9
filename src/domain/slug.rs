//! Utilities for turning post titles into unique URL slugs.
//!
//! Titles are normalised with a strict ASCII filter so that `Hello, World!`
//! becomes `hello-world`. Titles that leave nothing behind after filtering
//! (for example ones written entirely in a non-Latin script) fall back to the
//! transliterating `slug` crate, and titles made only of symbols use
//! [`FALLBACK_SLUG`]. Callers provide the uniqueness predicate so
//! the generation logic stays free of persistence concerns.

use std::future::Future;

use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 1_000;

/// Base slug for titles with no letters or digits in any script.
pub const FALLBACK_SLUG: &str = "post";

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
///
/// `Lookup` is recoverable: it carries the candidate that was being checked
/// when storage failed, so a write path may decide to proceed with it and
/// let the unique constraint have the final word.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error("uniqueness lookup for slug `{candidate}` failed")]
    Lookup {
        candidate: String,
        #[source]
        source: E,
    },
}

/// Apply the strict title normalisation.
///
/// Lowercases, trims, drops everything outside `a-z`, `0-9`, space and
/// hyphen, collapses whitespace runs, then joins words with hyphens. The
/// result may be empty.
pub fn normalize_title(title: &str) -> String {
    let filtered: String = title
        .to_lowercase()
        .trim()
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '0'..='9' | ' ' | '-'))
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Derive a base slug from a post title.
///
/// Only a blank title is rejected; any other title yields a slug.
pub fn derive_slug(title: &str) -> Result<String, SlugError> {
    if title.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let strict = normalize_title(title);
    if !strict.is_empty() {
        return Ok(strict);
    }

    let transliterated = slugify(title);
    if transliterated.is_empty() {
        return Ok(FALLBACK_SLUG.to_string());
    }

    Ok(transliterated)
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// The `is_unique` closure must return `true` when the provided slug does not
/// already exist. The helper retries by suffixing a monotonic counter
/// (`-2`, `-3`, …).
pub fn generate_unique_slug<F>(title: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(title)?;

    if is_unique(&base) {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base })
}

/// Async variant of [`generate_unique_slug`] that awaits the uniqueness predicate.
///
/// A failing predicate stops the search and surfaces
/// [`SlugAsyncError::Lookup`] with the candidate under test.
pub async fn generate_unique_slug_async<F, Fut, E>(
    title: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(title)?;

    match is_unique(&base).await {
        Ok(true) => return Ok(base),
        Ok(false) => {}
        Err(source) => {
            return Err(SlugAsyncError::Lookup {
                candidate: base,
                source,
            });
        }
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        match is_unique(&candidate).await {
            Ok(true) => return Ok(candidate),
            Ok(false) => {}
            Err(source) => return Err(SlugAsyncError::Lookup { candidate, source }),
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted { base }))
}
