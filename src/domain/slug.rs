//! Utilities for generating deterministic, URL-safe slugs.
//!
//! Base derivation lowercases the input, collapses separator runs into single
//! hyphens, and trims edge hyphens (`slug` crate). Consumers provide their own
//! uniqueness predicate so persistence conflicts stay out of the derivation
//! logic; during an edit the predicate is expected to exclude the entity's own
//! row from the collision check.

use std::future::Future;

use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 64;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// The `is_unique` closure must return `true` when the provided slug does not
/// already exist. On collision the helper retries with a monotonic numeric
/// suffix (`-1`, `-2`, …).
pub fn generate_unique_slug<F>(input: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(input)?;

    if is_unique(&base) {
        return Ok(base);
    }

    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base })
}

/// Async variant of [`generate_unique_slug`] that awaits the uniqueness predicate.
pub async fn generate_unique_slug_async<F, Fut, E>(
    input: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(input)?;

    if is_unique(&base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base);
    }

    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted { base }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_normalizes_separators() {
        assert_eq!(derive_slug("Hello,  World!").expect("slug"), "hello-world");
        assert_eq!(
            derive_slug("  Rust_2026 -- Rising  ").expect("slug"),
            "rust-2026-rising"
        );
    }

    #[test]
    fn derive_slug_has_no_edge_hyphens_and_is_idempotent() {
        let first = derive_slug("--Breaking: News!?--").expect("slug");
        assert!(!first.starts_with('-') && !first.ends_with('-'));
        assert!(first.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert_eq!(derive_slug(&first).expect("slug"), first);
    }

    #[test]
    fn derive_slug_rejects_empty_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn generate_unique_slug_appends_counter_from_one() {
        let mut existing = vec!["pattern-library".to_string()];
        let slug = generate_unique_slug("Pattern Library", |candidate| {
            if existing.iter().any(|s| s == candidate) {
                false
            } else {
                existing.push(candidate.to_string());
                true
            }
        })
        .expect("unique slug");

        assert_eq!(slug, "pattern-library-1");

        let next = generate_unique_slug("Pattern Library", |candidate| {
            !existing.iter().any(|s| s == candidate)
        })
        .expect("unique slug");
        assert_eq!(next, "pattern-library-2");
    }

    #[test]
    fn generate_unique_slug_exhausted() {
        let result =
            generate_unique_slug("Example", |_| false).expect_err("should exhaust attempts");
        assert_eq!(
            result,
            SlugError::Exhausted {
                base: "example".to_string()
            }
        );
    }

    #[tokio::test]
    async fn generate_unique_slug_async_skips_own_row_on_edit() {
        use std::sync::Arc;
        use tokio::sync::Mutex;

        // An edit excludes the entity's own row, so its current slug is "free".
        let taken_by_others = Arc::new(Mutex::new(vec!["weekly-digest-1".to_string()]));

        let slug = generate_unique_slug_async("Weekly Digest", |candidate| {
            let taken = taken_by_others.clone();
            let candidate = candidate.to_string();
            async move {
                let guard = taken.lock().await;
                Ok::<bool, std::convert::Infallible>(!guard.contains(&candidate))
            }
        })
        .await
        .expect("unique slug");

        assert_eq!(slug, "weekly-digest");
    }
}
