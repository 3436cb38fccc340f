//! Substitution Function Registry.
//!
//! A named table of string-to-string functions available to the template
//! rendering layer. Template text can carry function calls alongside plain
//! tags; the renderer looks the function up by name here, passes the textual
//! arguments through, and splices the result back into the text.
//!
//! Functions are numeric underneath: arguments are parsed as `f64`, the
//! result is formatted back to text. Arity is checked per call.
//!
//! The registry is shared, not owned: every [`crate::ParameterConfig`] holds
//! an `Arc` handle, so one pool serves all parameter groups and outlives
//! each of them.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Signature for substitution functions
pub type SubstFn = fn(&[f64]) -> f64;

/// Arity specification for a substitution function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Fixed number of arguments
    Fixed(usize),
    /// At least this many arguments
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, found: usize) -> bool {
        match *self {
            Arity::Fixed(n) => found == n,
            Arity::AtLeast(n) => found >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// One registered substitution function
#[derive(Clone)]
pub struct SubstFunc {
    pub name: &'static str,
    pub doc: &'static str,
    pub arity: Arity,
    func: SubstFn,
}

impl std::fmt::Debug for SubstFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubstFunc")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Named table of substitution functions
#[derive(Debug, Default)]
pub struct SubstRegistry {
    funcs: IndexMap<String, SubstFunc>,
}

impl SubstRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the standard pool: `EXP`, `LOG`, `POW10`,
    /// `ADD`, `MUL`.
    pub fn default_pool() -> Self {
        let mut registry = Self::new();
        registry.register(SubstFunc {
            name: "EXP",
            doc: "e raised to the argument",
            arity: Arity::Fixed(1),
            func: |args| args[0].exp(),
        });
        registry.register(SubstFunc {
            name: "LOG",
            doc: "natural logarithm of the argument",
            arity: Arity::Fixed(1),
            func: |args| args[0].ln(),
        });
        registry.register(SubstFunc {
            name: "POW10",
            doc: "10 raised to the argument",
            arity: Arity::Fixed(1),
            func: |args| 10f64.powf(args[0]),
        });
        registry.register(SubstFunc {
            name: "ADD",
            doc: "sum of the arguments",
            arity: Arity::AtLeast(1),
            func: |args| args.iter().sum(),
        });
        registry.register(SubstFunc {
            name: "MUL",
            doc: "product of the arguments",
            arity: Arity::AtLeast(1),
            func: |args| args.iter().product(),
        });
        registry
    }

    /// Register a function, replacing any previous entry with the same name
    pub fn register(&mut self, func: SubstFunc) {
        self.funcs.insert(func.name.to_string(), func);
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&SubstFunc> {
        self.funcs.get(name)
    }

    /// Check whether a function name is registered
    pub fn is_known(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered function names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }

    /// Apply a function to textual arguments.
    ///
    /// Arguments are parsed as `f64`; the numeric result is formatted back
    /// to text for splicing into a template.
    pub fn call(&self, name: &str, args: &[&str]) -> Result<String> {
        let func = self
            .funcs
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        if !func.arity.accepts(args.len()) {
            return Err(Error::FunctionArity {
                name: name.to_string(),
                expected: func.arity.to_string(),
                found: args.len(),
            });
        }
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value: f64 = arg.parse().map_err(|_| Error::BadFunctionArg {
                name: name.to_string(),
                arg: arg.to_string(),
            })?;
            values.push(value);
        }
        Ok(format!("{}", (func.func)(&values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_functions() {
        let registry = SubstRegistry::default_pool();
        assert!(registry.is_known("EXP"));
        assert!(registry.is_known("MUL"));
        assert!(!registry.is_known("RANDINT"));

        assert_eq!(registry.call("EXP", &["0"]).unwrap(), "1");
        assert_eq!(registry.call("POW10", &["2"]).unwrap(), "100");
        assert_eq!(registry.call("ADD", &["1", "2", "3.5"]).unwrap(), "6.5");
        assert_eq!(registry.call("MUL", &["2", "4"]).unwrap(), "8");
    }

    #[test]
    fn test_unknown_function() {
        let registry = SubstRegistry::default_pool();
        assert!(matches!(
            registry.call("NOPE", &["1"]),
            Err(Error::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_arity_checked() {
        let registry = SubstRegistry::default_pool();
        assert!(matches!(
            registry.call("EXP", &["1", "2"]),
            Err(Error::FunctionArity { .. })
        ));
        assert!(matches!(
            registry.call("ADD", &[]),
            Err(Error::FunctionArity { .. })
        ));
    }

    #[test]
    fn test_bad_argument() {
        let registry = SubstRegistry::default_pool();
        assert!(matches!(
            registry.call("LOG", &["ten"]),
            Err(Error::BadFunctionArg { .. })
        ));
    }

    #[test]
    fn test_register_custom_function() {
        let mut registry = SubstRegistry::new();
        registry.register(SubstFunc {
            name: "NEG",
            doc: "negate the argument",
            arity: Arity::Fixed(1),
            func: |args| -args[0],
        });
        assert_eq!(registry.call("NEG", &["3"]).unwrap(), "-3");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["NEG"]);
    }
}
