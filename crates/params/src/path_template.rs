//! Realization-indexed path templates.
//!
//! Per-realization init files are located through a printf-style format
//! string, e.g. `init/param_%d` or `init/%04d/values`. The format is
//! compiled once into literal and directive segments; instantiation
//! substitutes the realization index into every directive.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// One piece of a compiled format string
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Integer directive; `pad` is the zero-pad width (0 for plain `%d`)
    Index { pad: usize },
}

/// A compiled path format with integer realization-index directives.
///
/// Supports `%d` and zero-padded `%0Nd` directives plus `%%` as a literal
/// percent. Compilation fails on any other directive and on formats with no
/// index directive at all, since such a format would name the same file for
/// every realization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    format: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a format string.
    pub fn compile(format: &str) -> Result<Self> {
        let bad = |reason| Error::BadInitFormat {
            format: format.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    literal.push('%');
                }
                Some(_) => {
                    let mut width = String::new();
                    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        width.push(chars.next().unwrap());
                    }
                    match chars.next() {
                        Some('d') => {
                            let pad = if width.starts_with('0') {
                                width.parse().map_err(|_| bad("pad width out of range"))?
                            } else if width.is_empty() {
                                0
                            } else {
                                return Err(bad("only %d and %0Nd directives are supported"));
                            };
                            if !literal.is_empty() {
                                segments.push(Segment::Literal(std::mem::take(&mut literal)));
                            }
                            segments.push(Segment::Index { pad });
                        }
                        _ => return Err(bad("only %d and %0Nd directives are supported")),
                    }
                }
                None => return Err(bad("unterminated directive")),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        if !segments.iter().any(|s| matches!(s, Segment::Index { .. })) {
            return Err(bad("format has no realization-index directive"));
        }

        Ok(Self {
            format: format.to_string(),
            segments,
        })
    }

    /// Produce the concrete path for one realization index.
    ///
    /// With `zero_pad` false, `%0Nd` directives render unpadded; this is the
    /// form used for init-file lookup.
    pub fn instantiate(&self, index: usize, zero_pad: bool) -> PathBuf {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Index { pad } => {
                    let pad = *pad;
                    if zero_pad && pad > 0 {
                        path.push_str(&format!("{index:0pad$}"));
                    } else {
                        path.push_str(&index.to_string());
                    }
                }
            }
        }
        PathBuf::from(path)
    }

    /// The format string this template was compiled from
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_directive() {
        let template = PathTemplate::compile("init/param_%d").unwrap();
        assert_eq!(template.instantiate(7, false), PathBuf::from("init/param_7"));
    }

    #[test]
    fn test_padded_directive() {
        let template = PathTemplate::compile("init/%04d/values").unwrap();
        assert_eq!(
            template.instantiate(7, true),
            PathBuf::from("init/0007/values")
        );
        // Non-padded form ignores the declared width
        assert_eq!(
            template.instantiate(7, false),
            PathBuf::from("init/7/values")
        );
    }

    #[test]
    fn test_multiple_directives() {
        let template = PathTemplate::compile("ens_%d/init_%d").unwrap();
        assert_eq!(
            template.instantiate(3, false),
            PathBuf::from("ens_3/init_3")
        );
    }

    #[test]
    fn test_percent_escape() {
        let template = PathTemplate::compile("run%%cache/%d").unwrap();
        assert_eq!(template.instantiate(1, false), PathBuf::from("run%cache/1"));
    }

    #[test]
    fn test_missing_directive_rejected() {
        assert!(matches!(
            PathTemplate::compile("init/static"),
            Err(Error::BadInitFormat { .. })
        ));
    }

    #[test]
    fn test_unsupported_directive_rejected() {
        assert!(matches!(
            PathTemplate::compile("init/%s"),
            Err(Error::BadInitFormat { .. })
        ));
        assert!(matches!(
            PathTemplate::compile("init/%"),
            Err(Error::BadInitFormat { .. })
        ));
    }
}
