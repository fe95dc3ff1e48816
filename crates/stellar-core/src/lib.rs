//! Stellar Core Library
//!
//! Configuration, error handling and frontmatter decoding shared by the
//! Stellar content tooling.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod link;

pub use config::Config;
pub use error::{CoreError, Result};
pub use frontmatter::{DocumentFormat, RawDocument, RawFields};
pub use link::{LinkKind, parse_link};
