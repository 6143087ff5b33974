use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Names the upload bucket a media panel lists from and uploads into.
///
/// The value is opaque; the site currently serves [`MediaScope::BLOG`] and
/// [`MediaScope::ACTIVITIES`]. Surrounding whitespace is dropped on
/// construction, so padded names compare equal to their trimmed form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub struct MediaScope(SmolStr);

impl MediaScope {
    pub const BLOG: MediaScope = MediaScope(SmolStr::new_static("blog"));
    pub const ACTIVITIES: MediaScope = MediaScope(SmolStr::new_static("activities"));

    pub fn new(scope: impl Into<SmolStr>) -> Self {
        let scope = scope.into();
        let trimmed = scope.trim();
        if trimmed.len() == scope.len() {
            Self(scope)
        } else {
            Self(SmolStr::new(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank scopes never reach a backend.
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MediaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SmolStr> for MediaScope {
    fn from(s: SmolStr) -> Self {
        Self::new(s)
    }
}

impl From<MediaScope> for SmolStr {
    fn from(scope: MediaScope) -> Self {
        scope.0
    }
}

impl From<&str> for MediaScope {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MediaScope {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::str::FromStr for MediaScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_unset_scopes() {
        assert!(MediaScope::default().is_unset());
        assert!(MediaScope::from("  ").is_unset());
        assert!(!MediaScope::BLOG.is_unset());
    }

    #[test]
    fn test_padded_scope_equals_trimmed() {
        let padded = MediaScope::from(" blog ");
        assert_eq!(padded, MediaScope::BLOG);
        assert_eq!(padded.as_str(), "blog");
        assert_eq!(MediaScope::from(" activities ").to_string(), "activities");

        let scopes: HashSet<MediaScope> = [MediaScope::BLOG].into();
        assert!(scopes.contains(&MediaScope::new("\tblog\n")));
    }
}
