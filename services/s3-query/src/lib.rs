//! Signed urls for private objects on S3 compatible storage.
//!
//! This crate implements query string authentication: a private object url
//! is turned into a url carrying `AWSAccessKeyId`, `Expires` and `Signature`
//! parameters that anyone can fetch until it expires.
//!
//! - [`sign_request`] holds the signing algorithm: [`canonicalize`], [`sign`]
//!   and [`build_signed_url`].
//! - [`Dispatcher`] decides per resource whether signing applies, resolves
//!   credentials, region and expiry, and signs.
//!
//! ## Example
//!
//! ```
//! use presign_core::Context;
//! use presign_s3::{Config, Dispatcher, PolicyTable, Resolution};
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     access_key_id = "AKIDEXAMPLE"
//!     secret_access_key = "secret"
//!     region = "s3-us-west-2"
//!     "#,
//! )?;
//! let policies = PolicyTable::from_toml_str(
//!     r#"
//!     [resources."42"]
//!     enabled = true
//!     expires_in_minutes = 5
//!     "#,
//! )?;
//!
//! let dispatcher = Dispatcher::from_config(Context::new(), config, policies)?;
//! match dispatcher.resolve_signing("https://bucket.example.com/videos/a.mp4", "42")? {
//!     Resolution::Signed(url) => assert_eq!("s3-us-west-2.amazonaws.com", url.endpoint_host()),
//!     Resolution::Skip => unreachable!("resource 42 is enabled"),
//! }
//! # Ok::<(), presign_core::Error>(())
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

pub mod sign_request;
pub use sign_request::{
    build_signed_url, canonicalize, sign, RequestSigner, SignableRequest, SignedUrl,
};

mod policy;
pub use policy::{Expiry, PolicyLookup, PolicyTable, ResourceSigningPolicy};

mod hook;
pub use hook::{FixedOverride, Override, OverrideChain};

mod dispatch;
pub use dispatch::{Dispatcher, Resolution};
