//! # envtype
//!
//! Typed access to environment variables, plus a minimal `.env` loader.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use envtype::declare;
//!
//! fn main() -> envtype::Result<()> {
//!     envtype::load_default();
//!
//!     let database_url = declare("DATABASE_URL").as_string().required().resolve()?;
//!     let port = declare("PORT").as_int().with_default(8080).resolve()?;
//!     let debug = declare("DEBUG").as_bool().with_default(false).resolve()?;
//!     let timeout = declare("TIMEOUT")
//!         .as_duration()
//!         .with_default(Duration::from_secs(30))
//!         .resolve()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Declarations
//!
//! `declare(name)` starts a declaration. Pick exactly one type, then exactly
//! one presence mode, then resolve:
//!
//! | Type | Rust type |
//! |------|-----------|
//! | `as_string()` | `String` |
//! | `as_int()` | `i64` |
//! | `as_bool()` | `bool` |
//! | `as_float()` | `f64` |
//! | `as_duration()` | `std::time::Duration` |
//!
//! | Presence | Unset or empty variable |
//! |----------|-------------------------|
//! | `required()` | [`Error::Missing`] |
//! | `with_default(v)` | returns `v` |
//! | `optional()` | parses `""` (only strings succeed) |
//!
//! Every resolution reads the store again; nothing is cached.
//!
//! ## Error Handling
//!
//! Resolution returns [`Error`], which implements [`miette::Diagnostic`].
//! Missing and unparsable configuration is meant to stop the program, so
//! the usual approach is to return it from `main`:
//!
//! ```text
//! Error: envtype::missing_var
//!
//!   × required env var is missing: DATABASE_URL
//!   help: set DATABASE_URL in your environment or .env file
//! ```
//!
//! ## Environment Stores
//!
//! [`resolve`](EnvVar::resolve) and [`load_file`] use the process
//! environment. Their `*_from` / `*_into` counterparts take any
//! [`EnvStore`], such as [`MemoryEnv`], which keeps tests isolated.
//!
//! ## Logging
//!
//! The loader reports unreadable files and malformed lines through
//! [`tracing`]. Install a subscriber to see them.
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `secrecy` | `as_secret_string()` returning `secrecy::SecretString` | No |

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Re-export miette for error handling.
pub use miette;

/// Re-export secrecy when the feature is enabled.
#[cfg(feature = "secrecy")]
pub use secrecy;

#[cfg(feature = "secrecy")]
pub use secrecy::{ExposeSecret, SecretString};

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::Error;

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> envtype::Result<()> {
///     let port = envtype::declare("PORT").as_int().required().resolve()?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

mod source;
pub use source::Source;

pub mod store;
pub use store::{EnvStore, MemoryEnv, ProcessEnv, StoreError};

// ============================================================================
// Typed Access
// ============================================================================

pub mod declare;
pub mod duration;
pub mod value;

pub use declare::{Declaration, EnvVar, Presence, TypedDeclaration, declare};
pub use duration::{DurationError, parse_duration};
pub use value::{EnvValue, ParseBoolError, TargetType, parse_bool};

// ============================================================================
// Dotenv Loading
// ============================================================================

pub mod dotenv;

pub use dotenv::{
    LoadSummary, load_default, load_default_into, load_file, load_file_into, load_reader_into,
};
