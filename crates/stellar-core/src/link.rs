//! Link syntax checks shared by configuration and content validation.

use url::{ParseError, Url};

/// Base used to check that a relative link would resolve.
const RESOLUTION_BASE: &str = "http://localhost/";

/// Shape of a syntactically valid link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Absolute URL with a scheme (e.g. `https://example.com`).
    Absolute,
    /// Relative reference (e.g. `/about`, `../pricing`, `#faq`).
    Relative,
}

/// Check that `link` is a valid absolute URL or relative reference.
pub fn parse_link(link: &str) -> Result<LinkKind, ParseError> {
    if link.is_empty() || link.chars().any(char::is_whitespace) {
        return Err(ParseError::EmptyHost);
    }

    match Url::parse(link) {
        Ok(_) => Ok(LinkKind::Absolute),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RESOLUTION_BASE)?;
            base.join(link)?;
            Ok(LinkKind::Relative)
        }
        Err(e) => Err(e),
    }
}

/// Whether `link` is an absolute URL.
pub fn is_absolute(link: &str) -> bool {
    matches!(parse_link(link), Ok(LinkKind::Absolute))
}
