//! Parameter-configuration model.
//!
//! A [`ParameterConfig`] declares one named, vector-valued calibration
//! parameter: an ordered set of scalar sub-parameters, each bound to a prior,
//! plus the template file its realized values are rendered into. It is built
//! once from a declaration file, then treated as read-only and shared across
//! realization workers.
//!
//! # Declaration file
//!
//! One line per sub-parameter, whitespace-tokenized:
//!
//! ```text
//! PERM   LOGUNIF 1e-3 1e+1
//! PORO   UNIFORM 0.05 0.35
//! SKIN   NORMAL  0    1
//! ```
//!
//! The first token is the sub-parameter name, the rest is the prior
//! declaration (see [`calib_priors::PriorSpec`]). Line order defines the
//! index order used everywhere else.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calib_priors::{PriorError, PriorSpec};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::{self, OptionsTable};
use crate::path_template::PathTemplate;
use crate::subst::SubstRegistry;
use crate::tags::TagFormat;

/// Upper bound on a sub-parameter name token, in bytes
pub const MAX_NAME_LEN: usize = 127;

/// One scalar sub-parameter: name, tagged form, and prior.
///
/// The tagged name is derived from the name at parse time, so the three
/// fields can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubParameter {
    pub name: String,
    pub tagged_name: String,
    pub prior: PriorSpec,
}

/// Configuration of one named, vector-valued calibration parameter.
///
/// Immutable after construction except for the init-file template, which may
/// be replaced through [`ParameterConfig::set_init_file_format`]; the `&mut`
/// receiver there keeps the "no mutation during concurrent reads" rule
/// enforced by the borrow checker.
#[derive(Debug, Clone)]
pub struct ParameterConfig {
    key: String,
    entries: Vec<SubParameter>,
    template_file: PathBuf,
    init_file_template: Option<PathTemplate>,
    min_std: Option<Vec<f64>>,
    subst_registry: Arc<SubstRegistry>,
    tag_format: TagFormat,
}

impl ParameterConfig {
    /// Build a configuration from its declaration files.
    ///
    /// `declaration = None` is the supported degenerate state with zero
    /// sub-parameters (used when a prediction schedule masks in a parameter
    /// group without keywords). The template file must exist either way.
    /// Any failure aborts the whole build; no partial configuration is ever
    /// returned.
    pub fn from_files(
        key: &str,
        declaration: Option<&Path>,
        template_file: &Path,
        min_std_file: Option<&Path>,
        init_file_fmt: Option<&str>,
        subst_registry: Arc<SubstRegistry>,
    ) -> Result<Self> {
        Self::with_tag_format(
            key,
            declaration,
            template_file,
            min_std_file,
            init_file_fmt,
            subst_registry,
            TagFormat::default(),
        )
    }

    /// Like [`ParameterConfig::from_files`], with custom tag delimiters.
    pub fn with_tag_format(
        key: &str,
        declaration: Option<&Path>,
        template_file: &Path,
        min_std_file: Option<&Path>,
        init_file_fmt: Option<&str>,
        subst_registry: Arc<SubstRegistry>,
        tag_format: TagFormat,
    ) -> Result<Self> {
        if !template_file.is_file() {
            return Err(Error::MissingTemplateFile(template_file.to_path_buf()));
        }

        let entries = match declaration {
            Some(path) => read_declaration(path, &tag_format)?,
            None => Vec::new(),
        };
        let init_file_template = init_file_fmt.map(PathTemplate::compile).transpose()?;
        let min_std = min_std_file
            .map(|path| read_min_std(path, entries.len()))
            .transpose()?;

        debug!(
            key = %key,
            size = entries.len(),
            init_files = init_file_template.is_some(),
            min_std = min_std.is_some(),
            "parameter configuration loaded"
        );

        Ok(Self {
            key: key.to_string(),
            entries,
            template_file: template_file.to_path_buf(),
            init_file_template,
            min_std,
            subst_registry,
            tag_format,
        })
    }

    /// Build a configuration from an options table.
    ///
    /// Extracts `MIN_STD` and `INIT_FILES`; when no declaration path is
    /// given directly, the legacy `PARAMETERS` option key locates it. The
    /// result is identical to the equivalent [`ParameterConfig::from_files`]
    /// call.
    pub fn from_options(
        key: &str,
        declaration: Option<&Path>,
        template_file: &Path,
        options: &OptionsTable,
        subst_registry: Arc<SubstRegistry>,
    ) -> Result<Self> {
        // A directly supplied declaration path always wins; only its absence
        // activates the PARAMETERS fallback.
        let fallback = options.get(options::PARAMETERS).map(Path::new);
        let declaration = declaration.or(fallback);

        Self::from_files(
            key,
            declaration,
            template_file,
            options.get(options::MIN_STD).map(Path::new),
            options.get(options::INIT_FILES),
            subst_registry,
        )
    }

    /// Name of the whole parameter group
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of sub-parameters
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bound template file
    pub fn template_file(&self) -> &Path {
        &self.template_file
    }

    /// Tag delimiters used for this group
    pub fn tag_format(&self) -> &TagFormat {
        &self.tag_format
    }

    /// Sub-parameters in index order
    pub fn entries(&self) -> &[SubParameter] {
        &self.entries
    }

    /// Sub-parameter names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Index of the first sub-parameter with this exact name.
    ///
    /// Absence is a normal outcome, not an error.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Name of the sub-parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= size()`. Indices originate from vectors sized
    /// exactly to this configuration, so an out-of-range index is a caller
    /// bug that must surface immediately.
    pub fn name_at(&self, index: usize) -> &str {
        &self.entry_at(index).name
    }

    /// Tagged (delimited) name of the sub-parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= size()`, see [`ParameterConfig::name_at`].
    pub fn tagged_name_at(&self, index: usize) -> &str {
        &self.entry_at(index).tagged_name
    }

    /// Prior of the sub-parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= size()`, see [`ParameterConfig::name_at`].
    pub fn prior_at(&self, index: usize) -> &PriorSpec {
        &self.entry_at(index).prior
    }

    /// Canonical `KEY:NAME` identity string for result reporting and
    /// observation matching.
    ///
    /// # Panics
    ///
    /// Panics when `index >= size()`, see [`ParameterConfig::name_at`].
    pub fn user_key(&self, index: usize) -> String {
        format!("{}:{}", self.key, self.name_at(index))
    }

    fn entry_at(&self, index: usize) -> &SubParameter {
        match self.entries.get(index) {
            Some(entry) => entry,
            None => panic!(
                "sub-parameter index {index} out of range for '{}' (size {})",
                self.key,
                self.entries.len()
            ),
        }
    }

    /// Per-sub-parameter floor on standard deviation, when a min-std file
    /// was supplied.
    pub fn min_std(&self) -> Option<&[f64]> {
        self.min_std.as_deref()
    }

    /// Shared substitution-function registry
    pub fn subst_registry(&self) -> &Arc<SubstRegistry> {
        &self.subst_registry
    }

    /// Concrete init-file path for one realization, or `None` when values
    /// are sampled instead of read from files.
    ///
    /// The realization index is substituted unpadded.
    pub fn init_file_path(&self, realization: usize) -> Option<PathBuf> {
        self.init_file_template
            .as_ref()
            .map(|t| t.instantiate(realization, false))
    }

    /// The configured init-file template, if any
    pub fn init_file_template(&self) -> Option<&PathTemplate> {
        self.init_file_template.as_ref()
    }

    /// Replace the init-file template. The single post-construction
    /// mutation point; `None` reverts to default sampling.
    pub fn set_init_file_format(&mut self, format: Option<&str>) -> Result<()> {
        self.init_file_template = format.map(PathTemplate::compile).transpose()?;
        debug!(key = %self.key, format = ?format, "init file format replaced");
        Ok(())
    }

    /// Map a raw value vector into physical units, index by index.
    ///
    /// Pure and order-independent: output `i` depends only on `raw[i]` and
    /// the prior at `i`. The input length must match [`ParameterConfig::size`].
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.entries.len() {
            return Err(Error::ValueLengthMismatch {
                expected: self.entries.len(),
                found: raw.len(),
            });
        }
        Ok(self
            .entries
            .iter()
            .zip(raw)
            .map(|(entry, &x)| entry.prior.transform(x))
            .collect())
    }

    /// Render the bound template with physical values.
    ///
    /// Each occurrence of a tagged name in the template text is replaced by
    /// the corresponding value, formatted as text. The value vector must be
    /// index-aligned with the sub-parameters (pass the output of
    /// [`ParameterConfig::transform`]).
    pub fn render_template(&self, physical: &[f64]) -> Result<String> {
        if physical.len() != self.entries.len() {
            return Err(Error::ValueLengthMismatch {
                expected: self.entries.len(),
                found: physical.len(),
            });
        }
        let mut text = fs::read_to_string(&self.template_file).map_err(|source| Error::Io {
            path: self.template_file.clone(),
            source,
        })?;
        for (entry, value) in self.entries.iter().zip(physical) {
            text = text.replace(&entry.tagged_name, &format!("{value}"));
        }
        Ok(text)
    }
}

/// Read a declaration file into sub-parameter entries.
///
/// Blank lines are skipped. The file is pre-scanned once so the entry vector
/// is allocated with exact capacity before any line is parsed.
fn read_declaration(path: &Path, tag_format: &TagFormat) -> Result<Vec<SubParameter>> {
    if !path.is_file() {
        return Err(Error::MissingDeclarationFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let count = text.lines().filter(|l| !l.trim().is_empty()).count();
    let mut entries = Vec::with_capacity(count);

    for (line_idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let line_nr = line_idx + 1;
        if name.len() > MAX_NAME_LEN {
            return Err(Error::NameTooLong {
                path: path.to_path_buf(),
                line: line_nr,
                limit: MAX_NAME_LEN,
            });
        }
        let rest: Vec<&str> = tokens.collect();
        let malformed = |source| Error::MalformedDeclaration {
            path: path.to_path_buf(),
            line: line_nr,
            source,
        };
        let (family, args) = rest
            .split_first()
            .ok_or_else(|| malformed(PriorError::MissingDistribution))?;
        let prior = PriorSpec::parse_tokens(family, args).map_err(malformed)?;

        entries.push(SubParameter {
            name: name.to_string(),
            tagged_name: tag_format.tag(name),
            prior,
        });
    }
    Ok(entries)
}

/// Read a min-std override file: whitespace-separated values, one per
/// sub-parameter, in index order.
fn read_min_std(path: &Path, expected: usize) -> Result<Vec<f64>> {
    if !path.is_file() {
        return Err(Error::MissingMinStdFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::with_capacity(expected);
    for token in text.split_whitespace() {
        let value = token.parse().map_err(|_| Error::MalformedMinStd {
            path: path.to_path_buf(),
            token: token.to_string(),
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(Error::MinStdLength {
            path: path.to_path_buf(),
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_read_declaration_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "K1 UNIFORM 0 1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "K2 NORMAL 10 2").unwrap();

        let entries = read_declaration(&path, &TagFormat::default()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "K1");
        assert_eq!(entries[1].tagged_name, "<K2>");
    }

    #[test]
    fn test_read_declaration_malformed_line_names_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "K1 UNIFORM 0 1").unwrap();
        writeln!(file, "K2 UNIFORM zero 1").unwrap();

        let err = read_declaration(&path, &TagFormat::default()).unwrap_err();
        match err {
            Error::MalformedDeclaration { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_declaration_missing_distribution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "LONELY").unwrap();

        let err = read_declaration(&path, &TagFormat::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedDeclaration {
                source: PriorError::MissingDistribution,
                ..
            }
        ));
    }

    #[test]
    fn test_read_declaration_name_length_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{} CONST 1", "X".repeat(MAX_NAME_LEN + 1)).unwrap();

        let err = read_declaration(&path, &TagFormat::default()).unwrap_err();
        assert!(matches!(err, Error::NameTooLong { line: 1, .. }));
    }

    #[test]
    fn test_read_min_std_length_checked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("min_std.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "0.1 0.2 0.3").unwrap();

        assert_eq!(read_min_std(&path, 3).unwrap(), vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            read_min_std(&path, 2),
            Err(Error::MinStdLength {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_read_min_std_malformed_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("min_std.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "0.1 low").unwrap();

        assert!(matches!(
            read_min_std(&path, 2),
            Err(Error::MalformedMinStd { .. })
        ));
    }
}
