//! Prior distribution specifications for ensemble calibration.
//!
//! Every scalar sub-parameter of a calibration group carries a prior: a
//! distribution family plus numeric parameters. Raw ensemble state is kept
//! in standard-normal space; a prior's [`PriorSpec::transform`] maps one raw
//! value into physical units. Sampling and updating happen elsewhere; this
//! crate only parses prior declarations and applies the deterministic
//! transform.
//!
//! # Declaration syntax
//!
//! A prior is declared as a distribution name followed by its arguments,
//! e.g. `UNIFORM 0 1` or `NORMAL 10 2`. See [`PriorSpec::parse_tokens`].

pub mod error;
mod spec;

pub use error::{PriorError, Result};
pub use spec::PriorSpec;
