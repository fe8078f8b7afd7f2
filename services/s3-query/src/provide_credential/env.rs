use presign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::Credential;

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `PRESIGN_S3_ACCESS_KEY_ID`: The access key id
/// - `PRESIGN_S3_SECRET_ACCESS_KEY`: The secret access key
/// - `PRESIGN_S3_REGION`: The region (optional)
///
/// Nothing is returned unless at least one of the two keys is set.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let access_key_id = envs.get(PRESIGN_S3_ACCESS_KEY_ID);
        let secret_access_key = envs.get(PRESIGN_S3_SECRET_ACCESS_KEY);
        if access_key_id.is_none() && secret_access_key.is_none() {
            return Ok(None);
        }

        Ok(Some(Credential {
            access_key_id: access_key_id.cloned().unwrap_or_default(),
            secret_access_key: secret_access_key.cloned().unwrap_or_default(),
            region: envs.get(PRESIGN_S3_REGION).cloned().unwrap_or_default(),
        }))
    }
}
