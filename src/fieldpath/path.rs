//! Dotted field paths.

use super::AccessError;
use std::fmt;
use std::str::FromStr;

/// Path represents a complete path to a nested map field, such as
/// `spec.template.metadata.annotations`.
///
/// Every segment is a map key. A path always has at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parses a dot-delimited path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self, AccessError> {
        if path.is_empty() {
            return Err(AccessError::EmptyPath);
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AccessError::EmptySegment {
                path: path.to_string(),
            });
        }
        Ok(Path { segments })
    }

    /// Creates a path from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, AccessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(AccessError::EmptyPath);
        }
        if segments.iter().any(String::is_empty) {
            return Err(AccessError::EmptySegment {
                path: segments.join("."),
            });
        }
        Ok(Path { segments })
    }

    /// Returns the number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the last segment and the segments leading up to it.
    pub fn split_last(&self) -> (&str, &[String]) {
        match self.segments.split_last() {
            Some((last, parents)) => (last.as_str(), parents),
            None => ("", &[]),
        }
    }

    /// Renders the first `n` segments in dotted form.
    pub fn prefix(&self, n: usize) -> String {
        self.segments[..n.min(self.segments.len())].join(".")
    }
}

impl FromStr for Path {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
