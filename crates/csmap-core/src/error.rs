//! Error types for the mapper
//!
//! Mapping fails in exactly two ways: the declaration is missing or broken
//! ([`Error::Configuration`]), or a payload value cannot be coerced to the
//! declared field type ([`Error::TypeMismatch`]).

use crate::value::ValueKind;
use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the mapper
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type required to map has no usable mapping declaration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A payload value is incompatible with the declared field type
    #[error("Type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field path relative to the outermost instance, e.g. `items[1].num`
        path: String,
        /// Declared kind of the field
        expected: &'static str,
        /// Runtime kind of the payload value
        found: ValueKind,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create the error a field setter returns for a name it does not know
    ///
    /// This means the mapping table and the setter disagree, which is a
    /// declaration problem rather than a payload problem.
    pub fn unknown_field(entity: &str, field: &str) -> Self {
        Self::Configuration(format!("{} has no mapped field named {}", entity, field))
    }

    /// Create a type mismatch with an empty path
    ///
    /// The path is filled in by [`Error::within`] as the error travels
    /// back up through nested fields.
    pub fn mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self::TypeMismatch {
            path: String::new(),
            expected,
            found,
        }
    }

    /// Prefix the path of a type mismatch with a field name
    ///
    /// Configuration errors pass through untouched.
    pub fn within(self, field: &str) -> Self {
        match self {
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => {
                let path = if path.is_empty() {
                    field.to_string()
                } else if path.starts_with('[') {
                    format!("{field}{path}")
                } else {
                    format!("{field}.{path}")
                };
                Self::TypeMismatch {
                    path,
                    expected,
                    found,
                }
            }
            other => other,
        }
    }

    /// Prefix the path of a type mismatch with a sequence index
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => {
                let path = if path.is_empty() || path.starts_with('[') {
                    format!("[{index}]{path}")
                } else {
                    format!("[{index}].{path}")
                };
                Self::TypeMismatch {
                    path,
                    expected,
                    found,
                }
            }
            other => other,
        }
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this is a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Failing to read a declaration file is a configuration problem
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Configuration(format!("unable to read mapping declaration: {err}"))
    }
}

/// Malformed declaration JSON is a configuration problem
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("invalid mapping declaration: {err}"))
    }
}
