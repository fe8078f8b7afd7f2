//! Core components for signing object storage URLs.
//!
//! This crate provides the service-agnostic building blocks used by the
//! presign services:
//!
//! - **Context**: a container for the environment that credential providers read from
//! - **Traits**: [`ProvideCredential`] for loading credentials and [`SigningCredential`]
//!   for checking them
//! - **Chain**: [`ProvideCredentialChain`] to try several credential sources in order
//!
//! ## Example
//!
//! ```
//! use presign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};
//!
//! #[derive(Debug)]
//! struct FixedKey;
//!
//! impl ProvideCredential for FixedKey {
//!     type Credential = String;
//!
//!     fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
//!         Ok(Some("my-access-key".to_string()))
//!     }
//! }
//!
//! let chain = ProvideCredentialChain::new().push(FixedKey);
//! let key = chain.provide_credential(&Context::new())?;
//! assert_eq!(Some("my-access-key".to_string()), key);
//! # Ok::<(), presign_core::Error>(())
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC and digest helpers
//! - [`time`]: Time helpers built on chrono
//! - [`utils`]: Redaction of secrets in debug output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, NoopEnv, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
