//! Call-time overrides for credential values.

use std::fmt::Debug;
use std::sync::Arc;

use crate::Credential;

/// Override lets the host replace credential values right before signing.
///
/// Every method defaults to pass-through, so implementors only write the
/// hooks they need.
pub trait Override: Debug + Send + Sync + 'static {
    /// Replace the access key id.
    fn access_key_id(&self, access_key_id: String) -> String {
        access_key_id
    }

    /// Replace the secret access key.
    fn secret_access_key(&self, secret_access_key: String) -> String {
        secret_access_key
    }

    /// Replace the region.
    fn region(&self, region: String) -> String {
        region
    }
}

/// OverrideChain runs overrides in insertion order, each one seeing the
/// output of the previous.
#[derive(Debug, Clone, Default)]
pub struct OverrideChain {
    overrides: Vec<Arc<dyn Override>>,
}

impl OverrideChain {
    /// Create an empty chain, which leaves credentials untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override.
    pub fn push(mut self, o: impl Override) -> Self {
        self.overrides.push(Arc::new(o));
        self
    }

    /// Whether the chain has no overrides.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Apply every override to `cred`.
    pub fn apply(&self, cred: Credential) -> Credential {
        self.overrides
            .iter()
            .fold(cred, |cred, o| Credential {
                access_key_id: o.access_key_id(cred.access_key_id),
                secret_access_key: o.secret_access_key(cred.secret_access_key),
                region: o.region(cred.region),
            })
    }
}

/// FixedOverride replaces the values it holds and passes the rest through.
#[derive(Debug, Clone, Default)]
pub struct FixedOverride {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: Option<String>,
}

impl FixedOverride {
    /// Create an override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always use this access key id.
    pub fn with_access_key_id(mut self, v: impl Into<String>) -> Self {
        self.access_key_id = Some(v.into());
        self
    }

    /// Always use this secret access key.
    pub fn with_secret_access_key(mut self, v: impl Into<String>) -> Self {
        self.secret_access_key = Some(v.into());
        self
    }

    /// Always use this region.
    pub fn with_region(mut self, v: impl Into<String>) -> Self {
        self.region = Some(v.into());
        self
    }
}

impl Override for FixedOverride {
    fn access_key_id(&self, access_key_id: String) -> String {
        self.access_key_id.clone().unwrap_or(access_key_id)
    }

    fn secret_access_key(&self, secret_access_key: String) -> String {
        self.secret_access_key.clone().unwrap_or(secret_access_key)
    }

    fn region(&self, region: String) -> String {
        self.region.clone().unwrap_or(region)
    }
}
