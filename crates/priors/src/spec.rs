//! Distribution families and the raw-to-physical transform.
//!
//! Raw values live in standard-normal space. CDF-shaped families (UNIFORM,
//! LOGUNIF, DUNIF, ERRF, DERRF) push the raw value through the standard
//! normal CDF first, so a N(0,1) raw ensemble maps to the declared physical
//! distribution.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;

use crate::error::{PriorError, Result};

/// Standard normal CDF
fn phi(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Map a value in [0, 1] onto one of `steps` evenly spaced levels in [min, max].
fn discretize(u: f64, steps: u32, min: f64, max: f64) -> f64 {
    let steps = steps as f64;
    let level = (u * steps).floor().min(steps - 1.0);
    min + level / (steps - 1.0) * (max - min)
}

/// One sub-parameter's prior: distribution family plus numeric parameters.
///
/// Constructed from declaration-file tokens via [`PriorSpec::parse_tokens`];
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriorSpec {
    /// Fixed value, ignores the raw input
    Const { value: f64 },
    /// Identity, the raw value is the physical value
    Raw,
    /// `mean + std * x`
    Normal { mean: f64, std: f64 },
    /// `exp(mean + std * x)`
    LogNormal { mean: f64, std: f64 },
    /// Normal, clamped to [min, max]
    TruncatedNormal {
        mean: f64,
        std: f64,
        min: f64,
        max: f64,
    },
    /// Uniform on [min, max]
    Uniform { min: f64, max: f64 },
    /// Log-uniform on [min, max], min must be positive
    LogUniform { min: f64, max: f64 },
    /// Uniform over `steps` evenly spaced levels in [min, max]
    DUniform { steps: u32, min: f64, max: f64 },
    /// Error-function shaped: `min + (max - min) * phi(skew + width * x)`
    Errf {
        min: f64,
        max: f64,
        skew: f64,
        width: f64,
    },
    /// Discretized [`PriorSpec::Errf`] over `steps` levels
    Derrf {
        steps: u32,
        min: f64,
        max: f64,
        skew: f64,
        width: f64,
    },
}

impl PriorSpec {
    /// Parse a prior from whitespace-split declaration tokens.
    ///
    /// `family` is the distribution name as written in the declaration file
    /// (e.g. `UNIFORM`); `args` are the remaining tokens on the line.
    /// Argument count, numeric syntax, and family constraints are all
    /// checked here so a constructed spec can transform infallibly.
    pub fn parse_tokens(family: &str, args: &[&str]) -> Result<Self> {
        match family {
            "CONST" => {
                let [value] = parse_args::<1>("CONST", args)?;
                Ok(PriorSpec::Const { value })
            }
            "RAW" => {
                parse_args::<0>("RAW", args)?;
                Ok(PriorSpec::Raw)
            }
            "NORMAL" => {
                let [mean, std] = parse_args::<2>("NORMAL", args)?;
                require("NORMAL", "std must be non-negative", std, std >= 0.0)?;
                Ok(PriorSpec::Normal { mean, std })
            }
            "LOGNORMAL" => {
                let [mean, std] = parse_args::<2>("LOGNORMAL", args)?;
                require("LOGNORMAL", "std must be non-negative", std, std >= 0.0)?;
                Ok(PriorSpec::LogNormal { mean, std })
            }
            "TRUNCATED_NORMAL" => {
                let [mean, std, min, max] = parse_args::<4>("TRUNCATED_NORMAL", args)?;
                require("TRUNCATED_NORMAL", "std must be non-negative", std, std >= 0.0)?;
                require("TRUNCATED_NORMAL", "max must exceed min", max, max > min)?;
                Ok(PriorSpec::TruncatedNormal {
                    mean,
                    std,
                    min,
                    max,
                })
            }
            "UNIFORM" => {
                let [min, max] = parse_args::<2>("UNIFORM", args)?;
                require("UNIFORM", "max must exceed min", max, max > min)?;
                Ok(PriorSpec::Uniform { min, max })
            }
            "LOGUNIF" => {
                let [min, max] = parse_args::<2>("LOGUNIF", args)?;
                require("LOGUNIF", "min must be positive", min, min > 0.0)?;
                require("LOGUNIF", "max must exceed min", max, max > min)?;
                Ok(PriorSpec::LogUniform { min, max })
            }
            "DUNIF" => {
                let [steps, min, max] = parse_args::<3>("DUNIF", args)?;
                let steps = parse_steps("DUNIF", steps)?;
                require("DUNIF", "max must exceed min", max, max > min)?;
                Ok(PriorSpec::DUniform { steps, min, max })
            }
            "ERRF" => {
                let [min, max, skew, width] = parse_args::<4>("ERRF", args)?;
                require("ERRF", "max must exceed min", max, max > min)?;
                require("ERRF", "width must be positive", width, width > 0.0)?;
                Ok(PriorSpec::Errf {
                    min,
                    max,
                    skew,
                    width,
                })
            }
            "DERRF" => {
                let [steps, min, max, skew, width] = parse_args::<5>("DERRF", args)?;
                let steps = parse_steps("DERRF", steps)?;
                require("DERRF", "max must exceed min", max, max > min)?;
                require("DERRF", "width must be positive", width, width > 0.0)?;
                Ok(PriorSpec::Derrf {
                    steps,
                    min,
                    max,
                    skew,
                    width,
                })
            }
            other => Err(PriorError::UnknownDistribution(other.to_string())),
        }
    }

    /// Transform one raw standard-normal value into physical units.
    ///
    /// Pure and index-local: the result depends only on `x` and this spec.
    pub fn transform(&self, x: f64) -> f64 {
        match *self {
            PriorSpec::Const { value } => value,
            PriorSpec::Raw => x,
            PriorSpec::Normal { mean, std } => mean + std * x,
            PriorSpec::LogNormal { mean, std } => (mean + std * x).exp(),
            PriorSpec::TruncatedNormal {
                mean,
                std,
                min,
                max,
            } => (mean + std * x).clamp(min, max),
            PriorSpec::Uniform { min, max } => min + (max - min) * phi(x),
            PriorSpec::LogUniform { min, max } => {
                (min.ln() + phi(x) * (max.ln() - min.ln())).exp()
            }
            PriorSpec::DUniform { steps, min, max } => discretize(phi(x), steps, min, max),
            PriorSpec::Errf {
                min,
                max,
                skew,
                width,
            } => min + (max - min) * phi(skew + width * x),
            PriorSpec::Derrf {
                steps,
                min,
                max,
                skew,
                width,
            } => discretize(phi(skew + width * x), steps, min, max),
        }
    }

    /// Distribution name as written in declaration files
    pub fn family(&self) -> &'static str {
        match self {
            PriorSpec::Const { .. } => "CONST",
            PriorSpec::Raw => "RAW",
            PriorSpec::Normal { .. } => "NORMAL",
            PriorSpec::LogNormal { .. } => "LOGNORMAL",
            PriorSpec::TruncatedNormal { .. } => "TRUNCATED_NORMAL",
            PriorSpec::Uniform { .. } => "UNIFORM",
            PriorSpec::LogUniform { .. } => "LOGUNIF",
            PriorSpec::DUniform { .. } => "DUNIF",
            PriorSpec::Errf { .. } => "ERRF",
            PriorSpec::Derrf { .. } => "DERRF",
        }
    }
}

/// Parse exactly `N` numeric arguments for `family`.
fn parse_args<const N: usize>(family: &'static str, args: &[&str]) -> Result<[f64; N]> {
    if args.len() != N {
        return Err(PriorError::ArgCount {
            family,
            expected: N,
            found: args.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token.parse().map_err(|_| PriorError::BadNumber {
            family,
            token: token.to_string(),
        })?;
    }
    Ok(out)
}

fn require(family: &'static str, reason: &'static str, value: f64, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(PriorError::InvalidArgument {
            family,
            reason,
            value,
        })
    }
}

/// Step counts arrive as numeric tokens but must be integral and at least 2.
fn parse_steps(family: &'static str, raw: f64) -> Result<u32> {
    if raw.fract() != 0.0 || raw < 2.0 || raw > u32::MAX as f64 {
        return Err(PriorError::InvalidArgument {
            family,
            reason: "steps must be an integer >= 2",
            value: raw,
        });
    }
    Ok(raw as u32)
}
