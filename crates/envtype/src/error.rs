//! Error types for typed environment variable resolution.
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::Missing`] | A `required()` variable is unset or empty |
//! | [`Error::Parse`] | The raw value is not a valid literal of the declared type |
//!
//! Both are meant to be fatal at startup. The usual pattern is to bubble them
//! out of `main` with `?` and let [`miette`] render the report:
//!
//! ```rust,ignore
//! fn main() -> envtype::Result<()> {
//!     let port = envtype::declare("PORT").as_int().required().resolve()?;
//!     Ok(())
//! }
//! ```
//!
//! The dotenv loader never produces these; its failures are logged.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};

use miette::Diagnostic;

/// Errors returned by [`EnvVar::resolve`](crate::EnvVar::resolve).
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `envtype::missing_var` | Required environment variable not set |
/// | `envtype::parse_error` | Value failed to parse as the declared type |
#[derive(Diagnostic)]
pub enum Error {
    /// A required environment variable was absent or set to the empty string.
    #[diagnostic(code(envtype::missing_var), severity(Error))]
    Missing {
        /// The name of the missing environment variable.
        var: String,

        /// Help message naming the variable.
        #[help]
        help: String,
    },

    /// An environment variable value could not be parsed into the declared type.
    #[diagnostic(code(envtype::parse_error))]
    Parse {
        /// The name of the environment variable.
        var: String,

        /// The raw string value that failed to parse.
        value: String,

        /// Whether the declaration was marked `secret()`.
        secret: bool,

        /// The declared type name, e.g. `int` or `duration`.
        expected_type: String,

        /// Help text generated from `expected_type`.
        #[help]
        help: String,

        /// The underlying parser error.
        source: Box<dyn StdError + Send + Sync>,
    },
}

// Manual Display impl for secret masking
impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Missing { var, .. } => {
                write!(f, "required env var is missing: {var}")
            }

            Error::Parse {
                var,
                value,
                secret,
                expected_type,
                ..
            } => {
                if *secret {
                    write!(
                        f,
                        "failed to parse {expected_type} value for {var}: <redacted>"
                    )
                } else {
                    write!(f, "failed to parse {expected_type} value for {var}: {value:?}")
                }
            }
        }
    }
}

// Manual Debug impl for secret masking
impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Missing { var, help } => f
                .debug_struct("Missing")
                .field("var", var)
                .field("help", help)
                .finish(),

            Error::Parse {
                var,
                value,
                secret,
                expected_type,
                help,
                source,
            } => {
                let mut debug = f.debug_struct("Parse");
                debug.field("var", var);

                if *secret {
                    debug.field("value", &"<redacted>");
                } else {
                    debug.field("value", value);
                }

                debug
                    .field("secret", secret)
                    .field("expected_type", expected_type)
                    .field("help", help)
                    .field("source", source)
                    .finish()
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Parse { source, .. } => Some(source.as_ref()),
            Error::Missing { .. } => None,
        }
    }
}

impl Error {
    /// Creates a Missing error with a standard help message.
    pub fn missing(var: impl Into<String>) -> Self {
        let var = var.into();
        let help = format!("set {var} in your environment or .env file");
        Error::Missing { var, help }
    }

    /// Creates a Parse error with help text derived from the expected type.
    pub fn parse(
        var: impl Into<String>,
        value: impl Into<String>,
        secret: bool,
        expected_type: impl Into<String>,
        source: Box<dyn StdError + Send + Sync>,
    ) -> Self {
        let expected_type = expected_type.into();
        let help = format!("expected a valid {expected_type}");
        Error::Parse {
            var: var.into(),
            value: value.into(),
            secret,
            expected_type,
            help,
            source,
        }
    }

    /// Returns the name of the variable this error refers to.
    #[must_use]
    pub fn var(&self) -> &str {
        match self {
            Error::Missing { var, .. } | Error::Parse { var, .. } => var,
        }
    }

    /// Returns `true` for [`Error::Missing`].
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Error::Missing { .. })
    }

    /// Returns `true` for [`Error::Parse`].
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}
