use std::fmt::{Debug, Formatter};

use presign_core::{utils::Redact, SigningCredential};

/// Credential used to sign object urls.
///
/// A credential is a read-only snapshot: it is loaded once per signing call
/// and never mutated while in use.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Endpoint prefix such as `s3` or `s3-us-west-2`, the host is `{region}.amazonaws.com`.
    ///
    /// Empty means the default region.
    pub region: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Both keys are empty, so nothing can be signed.
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty() && self.secret_access_key.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

impl SigningCredential for Credential {
    /// A credential is usable as long as one of the keys is present.
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}
