//! Value types that an environment variable can be declared as.
//!
//! Each supported Rust type implements [`EnvValue`], which ties it to a
//! [`TargetType`] tag and a parser from the raw string.
//!
//! | [`TargetType`] | Rust type | Accepted literals |
//! |----------------|-----------|-------------------|
//! | `String` | [`String`] | anything |
//! | `Int` | [`i64`] | base-10, optional sign |
//! | `Bool` | [`bool`] | `1`, `t`, `true`, `0`, `f`, `false` (any case) |
//! | `Float` | [`f64`] | decimal and exponent forms, `inf`, `NaN`; no hex floats (`0x1p-2`) or `_` separators |
//! | `Duration` | [`std::time::Duration`] | see [`parse_duration`] |

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::duration::parse_duration;

/// Tag for the type a declaration parses into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TargetType {
    /// Identity; any string is valid.
    String,
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// 64-bit float.
    Float,
    /// Duration literal like `1h30m`.
    Duration,
}

impl TargetType {
    /// Lower-case name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Duration => "duration",
        }
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for boolean literals outside the accepted set.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("expected one of 1, t, true, 0, f, false")]
pub struct ParseBoolError;

/// A type an environment variable can be resolved to.
///
/// This trait is sealed; the builder only exposes the types listed in the
/// module docs.
pub trait EnvValue: Sized + sealed::Sealed {
    /// The tag recorded on declarations of this type.
    const TARGET: TargetType;

    /// Whether values of this type are always treated as secret.
    const ALWAYS_SECRET: bool = false;

    /// Parses a raw environment string.
    ///
    /// # Errors
    ///
    /// Returns the underlying parser error when `raw` is not a valid literal.
    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>>;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for bool {}
    impl Sealed for f64 {}
    impl Sealed for std::time::Duration {}
    #[cfg(feature = "secrecy")]
    impl Sealed for secrecy::SecretString {}
}

impl EnvValue for String {
    const TARGET: TargetType = TargetType::String;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(raw.to_string())
    }
}

impl EnvValue for i64 {
    const TARGET: TargetType = TargetType::Int;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(i64::from_str(raw)?)
    }
}

impl EnvValue for bool {
    const TARGET: TargetType = TargetType::Bool;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        parse_bool(raw).map_err(Into::into)
    }
}

impl EnvValue for f64 {
    const TARGET: TargetType = TargetType::Float;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(f64::from_str(raw)?)
    }
}

impl EnvValue for Duration {
    const TARGET: TargetType = TargetType::Duration;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(parse_duration(raw)?)
    }
}

#[cfg(feature = "secrecy")]
impl EnvValue for secrecy::SecretString {
    const TARGET: TargetType = TargetType::String;
    const ALWAYS_SECRET: bool = true;

    fn parse_env(raw: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self::from(raw.to_string()))
    }
}

/// Parses a boolean literal.
///
/// Accepts `1`, `t`, `true`, `0`, `f` and `false`, ignoring ASCII case.
///
/// # Errors
///
/// Returns [`ParseBoolError`] for anything else, including the empty string.
pub fn parse_bool(raw: &str) -> Result<bool, ParseBoolError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(ParseBoolError),
    }
}
