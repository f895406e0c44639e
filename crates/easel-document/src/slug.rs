//! Slugs and canonical URLs
//!
//! File names are turned into URL slugs; the canonical URL for a document
//! is `/f/{id}-{slug}`. After a publish changes the id (draft promoted) or
//! the slug (rename), views navigate to the canonical URL.

use crate::id::FileId;

/// Maximum slug length in characters
pub const MAX_SLUG_LEN: usize = 64;

/// Slug used when a name contains no usable characters
pub const FALLBACK_SLUG: &str = "untitled";

/// Turn a display name into a URL slug
///
/// Lowercases, keeps ASCII alphanumeric runs, joins them with single
/// dashes, and truncates to [`MAX_SLUG_LEN`].
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Canonical URL for a file: `/f/{id}-{slug}`
#[must_use]
pub fn canonical_url(id: FileId, name: &str) -> String {
    format!("/f/{}-{}", id.raw(), slugify(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Monthly Revenue"), "monthly-revenue");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("a  --  b!!c"), "a-b-c");
    }

    #[test]
    fn slugify_strips_edges() {
        assert_eq!(slugify("  (draft)  "), "draft");
    }

    #[test]
    fn slugify_empty_falls_back() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    #[test]
    fn slugify_truncates() {
        let long = "x".repeat(200);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn canonical_url_format() {
        let id = FileId::new(128).unwrap();
        assert_eq!(canonical_url(id, "Weekly KPIs"), "/f/128-weekly-kpis");
    }
}
