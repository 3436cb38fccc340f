//! Tag delimiters for template substitution.
//!
//! A sub-parameter name `PERM` becomes the tag `<PERM>` inside template
//! files. The delimiter pair is configurable; tag generation and template
//! rendering both go through [`TagFormat::tag`] so the two can never
//! disagree.

use serde::{Deserialize, Serialize};

/// Default opening delimiter for tagged names
pub const DEFAULT_START_TAG: &str = "<";
/// Default closing delimiter for tagged names
pub const DEFAULT_END_TAG: &str = ">";

/// Delimiter pair wrapped around sub-parameter names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFormat {
    pub start: String,
    pub end: String,
}

impl Default for TagFormat {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_TAG.to_string(),
            end: DEFAULT_END_TAG.to_string(),
        }
    }
}

impl TagFormat {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Wrap a name in the delimiter pair
    pub fn tag(&self, name: &str) -> String {
        format!("{}{}{}", self.start, name, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tag() {
        assert_eq!(TagFormat::default().tag("PERM"), "<PERM>");
    }

    #[test]
    fn test_custom_tag() {
        let tags = TagFormat::new("__", "__");
        assert_eq!(tags.tag("PORO"), "__PORO__");
    }
}
