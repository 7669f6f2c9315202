//! Fluent declaration and resolution of typed environment variables.
//!
//! A declaration moves through three stages, each a distinct type:
//!
//! ```text
//! declare(name)          -> Declaration
//!   .as_int() / ...      -> TypedDeclaration<T>
//!   .required() / ...    -> EnvVar<T>
//!   .resolve()           -> Result<T, Error>
//! ```
//!
//! Presence methods only exist on [`TypedDeclaration`], so a type must be
//! chosen before `required()`, `optional()` or `with_default()` compile.
//!
//! # Resolution
//!
//! The raw value is read from the store on every call; unset and empty are
//! the same thing. For an empty value:
//!
//! | Presence | Result |
//! |----------|--------|
//! | `required()` | [`Error::Missing`] |
//! | `with_default(v)` | `v`, never parsed |
//! | `optional()` | the empty string parsed as `T` |
//!
//! Note the last row: `optional()` on anything but a string still fails with
//! [`Error::Parse`] when the variable is unset, because `""` is not a valid
//! int, bool, float or duration. Use `with_default` for a fallback.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use envtype::{declare, MemoryEnv};
//!
//! let env: MemoryEnv = [("TIMEOUT", "1h30m")].into_iter().collect();
//!
//! let timeout = declare("TIMEOUT").as_duration().required().resolve_from(&env)?;
//! assert_eq!(timeout, Duration::from_secs(90 * 60));
//!
//! let workers = declare("WORKERS").as_int().with_default(4).resolve_from(&env)?;
//! assert_eq!(workers, 4);
//! # Ok::<(), envtype::Error>(())
//! ```

use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::time::Duration;

use crate::store::{EnvStore, ProcessEnv};
use crate::value::{EnvValue, TargetType};
use crate::{Error, Source};

/// Starts a declaration for the environment variable `name`.
pub fn declare(name: impl Into<String>) -> Declaration {
    Declaration { name: name.into() }
}

/// An untyped declaration holding only a variable name.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use = "a declaration does nothing until a type is selected and it is resolved"]
pub struct Declaration {
    name: String,
}

impl Declaration {
    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the variable as a [`String`].
    pub fn as_string(self) -> TypedDeclaration<String> {
        self.typed()
    }

    /// Reads the variable as a base-10 [`i64`].
    pub fn as_int(self) -> TypedDeclaration<i64> {
        self.typed()
    }

    /// Reads the variable as a [`bool`].
    pub fn as_bool(self) -> TypedDeclaration<bool> {
        self.typed()
    }

    /// Reads the variable as an [`f64`].
    pub fn as_float(self) -> TypedDeclaration<f64> {
        self.typed()
    }

    /// Reads the variable as a [`Duration`] literal like `1h30m`.
    pub fn as_duration(self) -> TypedDeclaration<Duration> {
        self.typed()
    }

    /// Reads the variable as a [`secrecy::SecretString`].
    ///
    /// The value is redacted in errors without calling
    /// [`secret()`](TypedDeclaration::secret).
    #[cfg(feature = "secrecy")]
    pub fn as_secret_string(self) -> TypedDeclaration<secrecy::SecretString> {
        self.typed()
    }

    fn typed<T: EnvValue>(self) -> TypedDeclaration<T> {
        TypedDeclaration {
            name: self.name,
            secret: T::ALWAYS_SECRET,
            _type: PhantomData,
        }
    }
}

/// A declaration with a target type but no presence mode yet.
#[must_use = "a declaration does nothing until it is resolved"]
pub struct TypedDeclaration<T> {
    name: String,
    secret: bool,
    _type: PhantomData<fn() -> T>,
}

// Manual impls: T itself is never stored, so no bounds on T.
impl<T> Clone for TypedDeclaration<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            secret: self.secret,
            _type: PhantomData,
        }
    }
}

impl<T: EnvValue> Debug for TypedDeclaration<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDeclaration")
            .field("name", &self.name)
            .field("target_type", &T::TARGET)
            .field("secret", &self.secret)
            .finish()
    }
}

impl<T: EnvValue> TypedDeclaration<T> {
    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared target type.
    #[must_use]
    pub const fn target_type(&self) -> TargetType {
        T::TARGET
    }

    /// Marks the value as secret; parse errors will not include it.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Uses `value` when the variable is unset or empty.
    pub fn with_default(self, value: T) -> EnvVar<T> {
        self.with_presence(Presence::Default(value))
    }

    /// Fails with [`Error::Missing`] when the variable is unset or empty.
    pub fn required(self) -> EnvVar<T> {
        self.with_presence(Presence::Required)
    }

    /// Parses the empty string when the variable is unset.
    ///
    /// Only [`String`] accepts an empty value; other types fail with
    /// [`Error::Parse`].
    pub fn optional(self) -> EnvVar<T> {
        self.with_presence(Presence::Optional)
    }

    fn with_presence(self, presence: Presence<T>) -> EnvVar<T> {
        EnvVar {
            name: self.name,
            secret: self.secret,
            presence,
        }
    }
}

/// How an empty or unset variable is handled.
#[derive(Clone, Debug, PartialEq)]
pub enum Presence<T> {
    /// Empty is an error.
    Required,
    /// Empty is parsed as the target type.
    Optional,
    /// Empty yields the carried value.
    Default(T),
}

/// A fully configured declaration, ready to resolve.
#[derive(Clone)]
#[must_use = "a declaration does nothing until it is resolved"]
pub struct EnvVar<T> {
    name: String,
    secret: bool,
    presence: Presence<T>,
}

impl<T: EnvValue + Debug> Debug for EnvVar<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("EnvVar");
        debug
            .field("name", &self.name)
            .field("target_type", &T::TARGET)
            .field("secret", &self.secret);

        match (&self.presence, self.secret) {
            (Presence::Default(_), true) => debug.field("presence", &"Default(<redacted>)"),
            (presence, _) => debug.field("presence", presence),
        };

        debug.finish()
    }
}

impl<T: EnvValue> EnvVar<T> {
    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared target type.
    #[must_use]
    pub const fn target_type(&self) -> TargetType {
        T::TARGET
    }

    /// The configured presence mode.
    #[must_use]
    pub const fn presence(&self) -> &Presence<T> {
        &self.presence
    }

    /// Whether values are redacted in errors.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        self.secret
    }

    /// Resolves against the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Missing`] for an empty `required()` variable and
    /// [`Error::Parse`] when the value is not a valid literal of type `T`.
    /// Callers should treat both as fatal configuration errors.
    pub fn resolve(self) -> Result<T, Error> {
        self.resolve_from(&ProcessEnv)
    }

    /// Resolves against `store`.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_from<S: EnvStore + ?Sized>(self, store: &S) -> Result<T, Error> {
        self.resolve_from_with_source(store).map(|(value, _)| value)
    }

    /// Resolves against the process environment, reporting where the value came from.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_with_source(self) -> Result<(T, Source), Error> {
        self.resolve_from_with_source(&ProcessEnv)
    }

    /// Resolves against `store`, reporting where the value came from.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_from_with_source<S: EnvStore + ?Sized>(
        self,
        store: &S,
    ) -> Result<(T, Source), Error> {
        let raw = store.get(&self.name);

        let source = if raw.is_empty() {
            match self.presence {
                Presence::Required => return Err(Error::missing(self.name)),

                Presence::Default(value) => {
                    tracing::debug!(var = %self.name, source = %Source::Default, "resolved environment variable");
                    return Ok((value, Source::Default));
                }

                Presence::Optional => Source::NotSet,
            }
        } else {
            Source::Environment
        };

        let value = T::parse_env(&raw)
            .map_err(|e| Error::parse(&self.name, raw, self.secret, T::TARGET.name(), e))?;

        tracing::debug!(var = %self.name, source = %source, "resolved environment variable");
        Ok((value, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryEnv;

    fn env(vars: &[(&str, &str)]) -> MemoryEnv {
        vars.iter().copied().collect()
    }

    #[test]
    fn test_declare_keeps_name() {
        let decl = declare("TEST_VAR");
        assert_eq!(decl.name(), "TEST_VAR");
        assert_eq!(decl.as_int().name(), "TEST_VAR");
    }

    #[test]
    fn test_type_selection_sets_target() {
        assert_eq!(declare("X").as_string().target_type(), TargetType::String);
        assert_eq!(declare("X").as_int().target_type(), TargetType::Int);
        assert_eq!(declare("X").as_bool().target_type(), TargetType::Bool);
        assert_eq!(declare("X").as_float().target_type(), TargetType::Float);
        assert_eq!(
            declare("X").as_duration().target_type(),
            TargetType::Duration
        );
    }

    #[test]
    fn test_presence_modes() {
        let typed = declare("X").as_int();
        assert_eq!(typed.clone().required().presence(), &Presence::Required);
        assert_eq!(typed.clone().optional().presence(), &Presence::Optional);
        assert_eq!(typed.with_default(7).presence(), &Presence::Default(7));
    }

    #[test]
    fn test_default_used_when_unset() {
        let store = env(&[]);
        let (value, source) = declare("X")
            .as_int()
            .with_default(7)
            .resolve_from_with_source(&store)
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(source, Source::Default);
    }

    #[test]
    fn test_default_used_when_empty() {
        let store = env(&[("X", "")]);
        let value = declare("X")
            .as_duration()
            .with_default(Duration::from_secs(3))
            .resolve_from(&store)
            .unwrap();
        assert_eq!(value, Duration::from_secs(3));
    }

    #[test]
    fn test_value_overrides_default() {
        let store = env(&[("X", "false")]);
        let (value, source) = declare("X")
            .as_bool()
            .with_default(true)
            .resolve_from_with_source(&store)
            .unwrap();
        assert!(!value);
        assert_eq!(source, Source::Environment);
    }

    #[test]
    fn test_invalid_value_with_default_still_fails() {
        let store = env(&[("X", "seven")]);
        let err = declare("X")
            .as_int()
            .with_default(7)
            .resolve_from(&store)
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_required_missing() {
        let store = env(&[]);
        let err = declare("X").as_int().required().resolve_from(&store).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.var(), "X");
    }

    #[test]
    fn test_required_empty_is_missing() {
        let store = env(&[("X", "")]);
        let err = declare("X")
            .as_string()
            .required()
            .resolve_from(&store)
            .unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_optional_int() {
        let store = env(&[("X", "42")]);
        assert_eq!(
            declare("X").as_int().optional().resolve_from(&store).unwrap(),
            42
        );

        let err = declare("X")
            .as_int()
            .optional()
            .resolve_from(&env(&[]))
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_optional_string_unset_is_empty() {
        let (value, source) = declare("X")
            .as_string()
            .optional()
            .resolve_from_with_source(&env(&[]))
            .unwrap();
        assert_eq!(value, "");
        assert_eq!(source, Source::NotSet);
    }

    #[test]
    fn test_optional_non_string_unset_fails_for_every_type() {
        let store = env(&[]);
        assert!(declare("X").as_bool().optional().resolve_from(&store).is_err());
        assert!(declare("X").as_float().optional().resolve_from(&store).is_err());
        assert!(
            declare("X")
                .as_duration()
                .optional()
                .resolve_from(&store)
                .is_err()
        );
    }

    #[test]
    fn test_duration_required() {
        let store = env(&[("X", "1h30m")]);
        let value = declare("X")
            .as_duration()
            .required()
            .resolve_from(&store)
            .unwrap();
        assert_eq!(value, Duration::from_secs(90 * 60));
    }

    #[test]
    fn test_parse_error_fields() {
        let store = env(&[("PORT", "not-an-int")]);
        let err = declare("PORT").as_int().required().resolve_from(&store).unwrap_err();

        match err {
            Error::Parse {
                var,
                value,
                expected_type,
                secret,
                ..
            } => {
                assert_eq!(var, "PORT");
                assert_eq!(value, "not-an-int");
                assert_eq!(expected_type, "int");
                assert!(!secret);
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_secret_value_redacted() {
        let store = env(&[("TOKEN_TTL", "hunter2")]);
        let err = declare("TOKEN_TTL")
            .as_duration()
            .secret()
            .required()
            .resolve_from(&store)
            .unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
        assert!(!format!("{err:?}").contains("hunter2"));
    }

    #[test]
    fn test_secret_default_redacted_in_debug() {
        let var = declare("PASSWORD")
            .as_string()
            .secret()
            .with_default("hunter2".to_string());
        assert!(var.is_secret());
        assert!(!format!("{var:?}").contains("hunter2"));
    }

    #[test]
    fn test_every_resolution_rereads_store() {
        let store = env(&[("X", "1")]);
        let decl = declare("X").as_int().required();

        assert_eq!(decl.clone().resolve_from(&store).unwrap(), 1);
        store.set("X", "2").unwrap();
        assert_eq!(decl.resolve_from(&store).unwrap(), 2);
    }

    #[cfg(feature = "secrecy")]
    #[test]
    fn test_secret_string_always_redacted() {
        use secrecy::ExposeSecret;

        let store = env(&[("API_KEY", "hunter2")]);
        let typed = declare("API_KEY").as_secret_string();
        assert_eq!(typed.target_type(), TargetType::String);

        let var = typed.required();
        assert!(var.is_secret());
        assert_eq!(var.resolve_from(&store).unwrap().expose_secret(), "hunter2");
    }

    #[test]
    fn test_value_not_trimmed() {
        let store = env(&[("X", " 42")]);
        assert!(declare("X").as_int().required().resolve_from(&store).is_err());
        assert_eq!(
            declare("X")
                .as_string()
                .required()
                .resolve_from(&store)
                .unwrap(),
            " 42"
        );
    }
}
