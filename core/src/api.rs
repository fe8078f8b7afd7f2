use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential can be used to sign.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used to load the credential at signing time.
///
/// Providers are read-only: every call returns a fresh snapshot and nothing is
/// cached between calls. Returning `Ok(None)` means this provider has nothing
/// to offer, which lets a [`ProvideCredentialChain`](crate::ProvideCredentialChain)
/// move on to the next one.
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + 'static;

    /// Load credential from the current context.
    fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
