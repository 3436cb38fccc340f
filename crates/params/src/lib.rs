//! Parameter configuration for ensemble-based model calibration.
//!
//! A calibration parameter group is declared in a small text file: one line
//! per scalar sub-parameter, binding a name to a prior distribution. This
//! crate parses those declarations into an immutable [`ParameterConfig`],
//! which drives three things at runtime:
//!
//! - the raw-to-physical [`ParameterConfig::transform`] of realized value
//!   vectors,
//! - tag substitution of physical values into a bound template file for the
//!   forward model,
//! - per-realization init-file lookup through an optional [`PathTemplate`].
//!
//! Prior parsing and transform math live in [`calib_priors`]; sampling,
//! updating, and forward-model execution live elsewhere entirely.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use calib_params::{ParameterConfig, SubstRegistry};
//!
//! let registry = Arc::new(SubstRegistry::default_pool());
//! let config = ParameterConfig::from_files(
//!     "WELLPARAMS",
//!     Some("wellparams.txt".as_ref()),
//!     "wellparams.tmpl".as_ref(),
//!     None,
//!     Some("init/params_%d"),
//!     registry,
//! )?;
//!
//! let physical = config.transform(&raw_values)?;
//! let rendered = config.render_template(&physical)?;
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod path_template;
pub mod subst;
pub mod tags;

pub use config::{ParameterConfig, SubParameter, MAX_NAME_LEN};
pub use error::{Error, Result};
pub use options::OptionsTable;
pub use path_template::PathTemplate;
pub use subst::{Arity, SubstFn, SubstFunc, SubstRegistry};
pub use tags::{TagFormat, DEFAULT_END_TAG, DEFAULT_START_TAG};
