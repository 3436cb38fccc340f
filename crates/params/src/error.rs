//! Configuration errors
//!
//! Every construction-time failure is a typed, recoverable error: a failed
//! build returns `Err` and no partial configuration. Out-of-range index
//! queries are the one exception: they are programmer errors and panic (see
//! [`crate::ParameterConfig::name_at`]).

use std::path::PathBuf;

use calib_priors::PriorError;
use thiserror::Error;

/// Configuration result type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("declaration file does not exist: {0}")]
    MissingDeclarationFile(PathBuf),

    #[error("template file does not exist: {0}")]
    MissingTemplateFile(PathBuf),

    #[error("min-std file does not exist: {0}")]
    MissingMinStdFile(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {source}")]
    MalformedDeclaration {
        path: PathBuf,
        line: usize,
        #[source]
        source: PriorError,
    },

    #[error("{path}:{line}: sub-parameter name exceeds {limit} bytes")]
    NameTooLong {
        path: PathBuf,
        line: usize,
        limit: usize,
    },

    #[error("{path}: invalid min-std value '{token}'")]
    MalformedMinStd { path: PathBuf, token: String },

    #[error("{path}: min-std file holds {found} value(s), expected {expected}")]
    MinStdLength {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("invalid init-file format '{format}': {reason}")]
    BadInitFormat { format: String, reason: &'static str },

    #[error("value vector holds {found} value(s), expected {expected}")]
    ValueLengthMismatch { expected: usize, found: usize },

    #[error("unknown substitution function: {0}")]
    UnknownFunction(String),

    #[error("{name} takes {expected} argument(s), got {found}")]
    FunctionArity {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("{name}: invalid numeric argument '{arg}'")]
    BadFunctionArg { name: String, arg: String },
}
