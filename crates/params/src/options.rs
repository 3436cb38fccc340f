//! Key-value options table.
//!
//! The declaration syntax allows trailing `KEY:VALUE` options on a parameter
//! keyword. The table recognizes `MIN_STD`, `INIT_FILES`, and the legacy
//! prediction-schedule key `PARAMETERS`; unrecognized keys are
//! kept, so callers can layer their own options on top.

use indexmap::IndexMap;
use tracing::warn;

/// Option key naming the min-std override file
pub const MIN_STD: &str = "MIN_STD";
/// Option key carrying the init-file path format
pub const INIT_FILES: &str = "INIT_FILES";
/// Legacy fallback key naming the declaration file
pub const PARAMETERS: &str = "PARAMETERS";

/// Parsed `KEY:VALUE` options, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsTable {
    entries: IndexMap<String, String>,
}

impl OptionsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `KEY:VALUE` tokens.
    ///
    /// The split is on the first `:` so values may contain colons. Tokens
    /// without a separator are skipped with a warning; a repeated key keeps
    /// the last value.
    pub fn parse<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = IndexMap::new();
        for item in items {
            let item = item.as_ref();
            match item.split_once(':') {
                Some((key, value)) if !key.is_empty() => {
                    entries.insert(key.to_string(), value.to_string());
                }
                _ => warn!(option = %item, "ignoring malformed option, expected KEY:VALUE"),
            }
        }
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
