//! Environment store abstraction.
//!
//! Both the dotenv loader and the typed accessor talk to an [`EnvStore`]
//! instead of `std::env` directly. [`ProcessEnv`] is the real process
//! environment; [`MemoryEnv`] is an isolated map that tests can use in
//! parallel without `#[serial]`.
//!
//! ```rust
//! use envtype::{EnvStore, MemoryEnv};
//!
//! let store = MemoryEnv::new();
//! store.set("PORT", "8080").unwrap();
//! assert_eq!(store.get("PORT"), "8080");
//! assert_eq!(store.get("MISSING"), "");
//! ```

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error as ThisError;

/// Errors returned by [`EnvStore::set`].
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    /// The variable name is empty or contains `=` or NUL.
    #[error("invalid environment variable name {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The value contains a NUL byte.
    #[error("value for {name} contains a NUL byte")]
    InvalidValue {
        /// The variable whose value was rejected.
        name: String,
    },
}

/// A key/value table of configuration strings.
pub trait EnvStore: Send + Sync {
    /// Returns the value of `name`, or an empty string when it is unset.
    ///
    /// Unset and set-to-empty are indistinguishable through this method.
    fn get(&self, name: &str) -> String;

    /// Sets `name` to `value`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the name or value cannot be stored.
    fn set(&self, name: &str, value: &str) -> Result<(), StoreError>;
}

/// Rejects names and values the operating system cannot represent.
///
/// `std::env::set_var` panics on these, so every store applies the same rules.
fn check_entry(name: &str, value: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
        });
    }
    if value.contains('\0') {
        return Err(StoreError::InvalidValue {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// The process environment, backed by [`std::env`].
///
/// # Thread Safety
///
/// Writes go through `std::env::set_var`. Do not call [`EnvStore::set`] (or
/// load a dotenv file into this store) while other threads may be reading
/// the environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, name: &str) -> String {
        match std::env::var(name) {
            Ok(value) => value,

            Err(std::env::VarError::NotPresent) => String::new(),

            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(var = name, "environment variable contains invalid UTF-8");
                String::new()
            }
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        check_entry(name, value)?;

        // SAFETY: name and value were checked above; concurrent access is
        // the caller's responsibility as documented on `ProcessEnv`.
        unsafe {
            std::env::set_var(name, value);
        }
        Ok(())
    }
}

/// An in-memory environment store.
///
/// # Example
///
/// ```rust
/// use envtype::{EnvStore, MemoryEnv};
///
/// let store: MemoryEnv = [("HOST", "localhost")].into_iter().collect();
/// assert_eq!(store.get("HOST"), "localhost");
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `name`, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.vars.write().remove(name)
    }

    /// Returns `true` if `name` has an entry, even an empty one.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.read().contains_key(name)
    }

    /// Number of stored variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Returns `true` if no variables are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

/// Collects entries through [`EnvStore::set`]; entries it refuses are
/// skipped with a warning.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = Self::new();
        for (name, value) in iter {
            let (name, value): (String, String) = (name.into(), value.into());
            if let Err(error) = store.set(&name, &value) {
                tracing::warn!(%error, "skipping invalid env entry");
            }
        }
        store
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, name: &str) -> String {
        self.vars.read().get(name).cloned().unwrap_or_default()
    }

    fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        check_entry(name, value)?;
        self.vars
            .write()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: EnvStore + ?Sized> EnvStore for &S {
    fn get(&self, name: &str) -> String {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(name, value)
    }
}
