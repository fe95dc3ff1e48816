//! URL-safe entry identifiers.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A URL-safe identifier, unique within its collection.
///
/// Lowercase ASCII letters and digits, separated by single hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse a slug, rejecting anything that is not URL-safe.
    pub fn parse(slug: impl Into<String>) -> Result<Self, ValidationError> {
        let slug = slug.into();
        if is_valid_slug(&slug) {
            Ok(Self(slug))
        } else {
            Err(ValidationError::InvalidSlug { slug })
        }
    }

    /// Derive a slug from a human-entered name.
    ///
    /// Returns `None` when the name has no ASCII letters or digits.
    pub fn from_name(name: &str) -> Option<Self> {
        let slug = slugify(name);
        (!slug.is_empty()).then_some(Self(slug))
    }

    /// The slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `slug` is lowercase alphanumerics separated by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// Turn a name into a slug: `"Hello, World!"` becomes `"hello-world"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            // Apostrophes vanish: "Don't" becomes "dont", not "don-t".
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Jane   Doe "), "jane-doe");
        assert_eq!(slugify("Don't Panic"), "dont-panic");
        assert_eq!(slugify("Web 3.0 Services"), "web-3-0-services");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Slug::parse("jane-doe").expect("valid").as_str(), "jane-doe");
        assert!(matches!(
            Slug::parse("Jane Doe"),
            Err(ValidationError::InvalidSlug { slug }) if slug == "Jane Doe"
        ));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            Slug::from_name("My First Post").map(String::from).as_deref(),
            Some("my-first-post")
        );
        assert!(Slug::from_name("???").is_none());
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: Slug = serde_json::from_str("\"acme-co\"").expect("deserialize");
        assert_eq!(ok.to_string(), "acme-co");
        assert!(serde_json::from_str::<Slug>("\"Acme Co\"").is_err());
    }
}
