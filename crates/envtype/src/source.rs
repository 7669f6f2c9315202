//! Source attribution for resolved values.

use std::fmt::{self, Display, Formatter};

/// Indicates where a resolved value came from.
///
/// Returned alongside the value by
/// [`EnvVar::resolve_with_source`](crate::EnvVar::resolve_with_source).
///
/// ```rust,ignore
/// let (timeout, source) = declare("TIMEOUT")
///     .as_duration()
///     .with_default(Duration::from_secs(30))
///     .resolve_with_source()?;
///
/// if source == Source::Default {
///     tracing::info!("TIMEOUT not set, using {timeout:?}");
/// }
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Source {
    /// Parsed from a non-empty value in the environment store.
    Environment,

    /// The variable was empty and the declared default was returned.
    Default,

    /// The variable was empty, declared `optional()`, and parsed from `""`.
    NotSet,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "Environment variable"),

            Self::Default => write!(f, "Default value"),

            Self::NotSet => write!(f, "Not set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Environment.to_string(), "Environment variable");
        assert_eq!(Source::Default.to_string(), "Default value");
        assert_eq!(Source::NotSet.to_string(), "Not set");
    }
}
