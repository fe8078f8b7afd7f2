//! Decide per resource whether and how to sign.

use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, warn};
use presign_core::time::DateTime;
use presign_core::{Context, Error, ProvideCredential, Result, SigningCredential};

use crate::constants::DEFAULT_REGION;
use crate::hook::{Override, OverrideChain};
use crate::policy::{Expiry, PolicyLookup, ResourceSigningPolicy};
use crate::provide_credential::DefaultCredentialProvider;
use crate::sign_request::{RequestSigner, SignedUrl};
use crate::{Config, Credential};

/// Outcome of a successful [`Dispatcher::resolve_signing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The resource is signed, use this url instead of the original.
    Signed(SignedUrl),
    /// Signing is off for this resource, use the original url unchanged.
    Skip,
}

impl Resolution {
    /// Whether signing was skipped.
    pub fn is_skip(&self) -> bool {
        matches!(self, Resolution::Skip)
    }

    /// The signed url, if any.
    pub fn signed_url(&self) -> Option<&SignedUrl> {
        match self {
            Resolution::Signed(url) => Some(url),
            Resolution::Skip => None,
        }
    }
}

/// Dispatcher decides per resource whether a url must be signed and signs it.
///
/// All inputs are injected at construction and only read afterwards, so a
/// dispatcher can serve concurrent calls without locking.
///
/// ```
/// use presign_s3::{Dispatcher, PolicyTable, ResourceSigningPolicy, StaticCredentialProvider};
/// use presign_core::Context;
///
/// let policies = PolicyTable::new().with_policy("42", ResourceSigningPolicy::enabled());
/// let dispatcher = Dispatcher::new(
///     Context::new(),
///     StaticCredentialProvider::new("AKIDEXAMPLE", "secret"),
///     policies,
/// );
///
/// let url = dispatcher.filter_url("https://bucket.example.com/videos/a.mp4", "42")?;
/// assert!(url.starts_with("https://s3.amazonaws.com/videos/a.mp4?AWSAccessKeyId=AKIDEXAMPLE&Expires="));
///
/// let url = dispatcher.filter_url("https://bucket.example.com/videos/b.mp4", "43")?;
/// assert_eq!("https://bucket.example.com/videos/b.mp4", url);
/// # Ok::<(), presign_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = Credential>>,
    policies: Arc<dyn PolicyLookup>,
    overrides: OverrideChain,
    default_expiry: Expiry,
    signer: RequestSigner,
}

impl Dispatcher {
    /// Create a dispatcher with the default 3 minute expiry.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = Credential>,
        policies: impl PolicyLookup,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            policies: Arc::new(policies),
            overrides: OverrideChain::new(),
            default_expiry: Expiry::default(),
            signer: RequestSigner::new(),
        }
    }

    /// Create a dispatcher from config.
    ///
    /// Fields left unset by `config` are filled from env: credentials on
    /// every call, the default expiry once here.
    ///
    /// Returns an error if `PRESIGN_S3_EXPIRES_IN` is not a valid number of
    /// minutes.
    pub fn from_config(
        ctx: Context,
        config: Config,
        policies: impl PolicyLookup,
    ) -> Result<Self> {
        let default_expiry = config.clone().from_env(&ctx)?.default_expiry();
        let loader = DefaultCredentialProvider::new(Arc::new(config));

        Ok(Self::new(ctx, loader, policies).with_default_expiry(default_expiry))
    }

    /// Append a call-time override for credential values.
    pub fn with_override(mut self, o: impl Override) -> Self {
        self.overrides = self.overrides.push(o);
        self
    }

    /// Set the expiry used by resources without their own.
    pub fn with_default_expiry(mut self, expiry: Expiry) -> Self {
        self.default_expiry = expiry;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.signer = self.signer.with_time(time);
        self
    }

    /// Resolve how `resource_url` of `resource_id` should be served.
    ///
    /// - [`Resolution::Skip`] if the resource has no policy or it's disabled,
    ///   whatever the credential state.
    /// - [`Resolution::Signed`] on success.
    /// - An error with [`ErrorKind::CredentialMissing`](presign_core::ErrorKind::CredentialMissing)
    ///   if both keys are empty, or
    ///   [`ErrorKind::RequestInvalid`](presign_core::ErrorKind::RequestInvalid) if
    ///   `resource_url` can't be parsed.
    pub fn resolve_signing(&self, resource_url: &str, resource_id: &str) -> Result<Resolution> {
        let Some(policy) = self
            .policies
            .resource_policy(resource_id)
            .filter(|p| p.enabled)
        else {
            debug!("signing is disabled for resource {resource_id}, skipped");
            return Ok(Resolution::Skip);
        };

        let cred = self.loader.provide_credential(&self.ctx)?;
        self.sign_with(resource_url, policy, cred)
    }

    /// Like [`Dispatcher::resolve_signing`], but returns the url to serve.
    ///
    /// Skipped resources get `resource_url` back unchanged.
    pub fn filter_url<'a>(
        &self,
        resource_url: &'a str,
        resource_id: &str,
    ) -> Result<Cow<'a, str>> {
        match self.resolve_signing(resource_url, resource_id)? {
            Resolution::Signed(url) => Ok(Cow::Owned(url.to_string())),
            Resolution::Skip => Ok(Cow::Borrowed(resource_url)),
        }
    }

    fn sign_with(
        &self,
        resource_url: &str,
        policy: ResourceSigningPolicy,
        cred: Option<Credential>,
    ) -> Result<Resolution> {
        let mut cred = self.overrides.apply(cred.unwrap_or_default());
        if !cred.is_valid() {
            return Err(Error::credential_missing(
                "access keys have not been entered yet",
            ));
        }
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            warn!("one of the access keys is empty, signed urls will likely be rejected");
        }
        if cred.region.trim().is_empty() {
            cred.region = DEFAULT_REGION.to_string();
        }

        let expires_in = policy.expires_in.unwrap_or(self.default_expiry);
        let signed = self.signer.sign(&cred, resource_url, expires_in)?;
        Ok(Resolution::Signed(signed))
    }
}
