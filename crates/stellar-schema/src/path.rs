//! Field paths for locating a value inside a document.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named field of an object.
    Field(String),
    /// Position inside an array or block sequence.
    Index(usize),
}

/// Location of a value, e.g. `builder[2].items[0].testimonial`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, pointing at the value being validated.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a named child field.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.into()));
        Self(segments)
    }

    /// Path of a positional child.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(value)");
        }

        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = FieldPath::root()
            .field("builder")
            .index(2)
            .field("items")
            .index(0)
            .field("testimonial");
        assert_eq!(path.to_string(), "builder[2].items[0].testimonial");
    }

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "(value)");
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::root().index(3).to_string(), "[3]");
    }
}
