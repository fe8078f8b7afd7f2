//! Query string authentication for S3 compatible object urls.
//!
//! - [Query String Request Authentication Alternative](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html#RESTAuthenticationQueryStringAuth)

use std::fmt::{Debug, Display, Formatter};

use http::Method;
use log::debug;
use percent_encoding::{percent_decode_str, percent_encode};
use presign_core::hash::base64_hmac_sha1;
use presign_core::time::{now, DateTime};
use presign_core::utils::Redact;
use presign_core::{Error, Result};
use url::Url;

use crate::constants::*;
use crate::policy::Expiry;
use crate::Credential;

/// Percent-encode an object path, keeping `/` separators literal.
///
/// Escapes already in `path` are decoded to raw bytes first, so both
/// `/videos/a b.mp4` and `/videos/a%20b.mp4` become `videos/a%20b.mp4`, and
/// escapes that aren't UTF-8 such as `%FF` are kept as they are. Leading
/// slashes are stripped.
pub fn encode_object_path(path: &str) -> String {
    let raw: Vec<u8> = percent_decode_str(path.trim_start_matches('/')).collect();
    percent_encode(&raw, &OBJECT_PATH_ENCODE_SET).to_string()
}

/// Host that serves signed urls for `region`.
///
/// The region is an endpoint prefix, the host is always
/// `{region}.amazonaws.com`:
///
/// - empty region: `s3.amazonaws.com`
/// - `s3-us-west-2`: `s3-us-west-2.amazonaws.com`
/// - `s3.dualstack.eu-west-1`: `s3.dualstack.eu-west-1.amazonaws.com`
pub fn endpoint_host(region: &str) -> String {
    let region = match region.trim() {
        "" => DEFAULT_REGION,
        v => v,
    };
    format!("{region}.{ENDPOINT_SUFFIX}")
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Expires + "\n" +
/// CanonicalizedResource;
/// ```
///
/// `resource_path` is the object path, percent-encoded or not. It is
/// normalized by [`encode_object_path`], so `/a%20b` and `/a b` both end up
/// as `/a%20b`, and the resource always starts with `/`.
pub fn canonicalize(
    method: &Method,
    content_md5: &str,
    content_type: &str,
    expires_at: i64,
    resource_path: &str,
) -> String {
    let mut s = String::with_capacity(32 + resource_path.len());
    s.push_str(method.as_str());
    s.push('\n');
    s.push_str(content_md5);
    s.push('\n');
    s.push_str(content_type);
    s.push('\n');
    s.push_str(&expires_at.to_string());
    s.push('\n');
    s.push('/');
    s.push_str(&encode_object_path(resource_path));
    s
}

/// Sign the string to sign with the secret key, returns base64 encoded HMAC-SHA1.
pub fn sign(secret_access_key: &str, string_to_sign: &str) -> String {
    base64_hmac_sha1(secret_access_key.as_bytes(), string_to_sign.as_bytes())
}

/// Assemble a signed url from its parts.
///
/// `object_path` is normalized by [`encode_object_path`] the same way as in
/// [`canonicalize`].
pub fn build_signed_url(
    scheme: &str,
    endpoint_host: &str,
    access_key_id: &str,
    object_path: &str,
    expires_at: i64,
    signature: &str,
) -> SignedUrl {
    SignedUrl {
        scheme: scheme.to_string(),
        endpoint_host: endpoint_host.to_string(),
        object_path: encode_object_path(object_path),
        access_key_id: access_key_id.to_string(),
        expires: expires_at,
        signature: signature.to_string(),
    }
}

/// The request a signature is computed over.
///
/// Only retrieval is supported, so `Content-MD5` and `Content-Type` are
/// always empty, but their lines stay in the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    /// HTTP method, always `GET`.
    pub method: Method,
    /// Content-MD5, always empty.
    pub content_md5: String,
    /// Content-Type, always empty.
    pub content_type: String,
    /// Unix timestamp in seconds after which the url is rejected.
    pub expires_at: i64,
    /// Object path as found in the resource url, percent-encoded or not.
    pub resource_path: String,
}

impl SignableRequest {
    /// Create a GET request for `resource_path` expiring at `expires_at`.
    pub fn get(expires_at: i64, resource_path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            content_md5: String::new(),
            content_type: String::new(),
            expires_at,
            resource_path: resource_path.into(),
        }
    }

    /// Build the string to sign of this request.
    pub fn string_to_sign(&self) -> String {
        canonicalize(
            &self.method,
            &self.content_md5,
            &self.content_type,
            self.expires_at,
            &self.resource_path,
        )
    }
}

/// A url granting time-bounded access to a private object.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedUrl {
    scheme: String,
    endpoint_host: String,
    object_path: String,
    access_key_id: String,
    expires: i64,
    signature: String,
}

impl SignedUrl {
    /// Scheme copied from the resource url.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host serving this url.
    pub fn endpoint_host(&self) -> &str {
        &self.endpoint_host
    }

    /// Percent-encoded object path, without the leading `/`.
    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    /// Access key id carried by this url.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Unix timestamp in seconds when this url expires.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// Base64 encoded signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Encoded query string, parameters in a fixed order.
    pub fn query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(QUERY_ACCESS_KEY_ID, &self.access_key_id)
            .append_pair(QUERY_EXPIRES, &self.expires.to_string())
            .append_pair(QUERY_SIGNATURE, &self.signature)
            .finish()
    }
}

impl Display for SignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}://{}/{}?{}",
            self.scheme,
            self.endpoint_host,
            self.object_path,
            self.query()
        )
    }
}

impl Debug for SignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrl")
            .field("scheme", &self.scheme)
            .field("endpoint_host", &self.endpoint_host)
            .field("object_path", &self.object_path)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("expires", &self.expires)
            .field("signature", &Redact::from(&self.signature))
            .finish()
    }
}

/// RequestSigner turns a resource url into a signed url.
///
/// It holds no state besides an optional fixed signing time, so one signer
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer that signs at the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign `resource_url` so it can be fetched for `expires_in`.
    ///
    /// Only the scheme and path of `resource_url` are kept; the host is
    /// replaced by the endpoint of the credential's region.
    pub fn sign(
        &self,
        cred: &Credential,
        resource_url: &str,
        expires_in: Expiry,
    ) -> Result<SignedUrl> {
        let resource_url = resource_url.trim();
        let url = parse_resource_url(resource_url)?;
        let now = self.time.unwrap_or_else(now);
        let expires_at = expires_at(now, expires_in)?;

        let req = SignableRequest::get(expires_at, raw_path(resource_url));
        let signature = sign(&cred.secret_access_key, &req.string_to_sign());

        let host = endpoint_host(&cred.region);
        debug!(
            "signed /{} for {host}, expires at {expires_at}",
            encode_object_path(&req.resource_path)
        );

        Ok(build_signed_url(
            url.scheme(),
            &host,
            &cred.access_key_id,
            &req.resource_path,
            expires_at,
            &signature,
        ))
    }
}

fn parse_resource_url(resource_url: &str) -> Result<Url> {
    let url = Url::parse(resource_url).map_err(|e| {
        Error::request_invalid(format!("resource url '{resource_url}' can't be parsed"))
            .with_source(e)
    })?;
    if url.cannot_be_a_base() {
        return Err(Error::request_invalid(format!(
            "resource url '{resource_url}' has no object path"
        )));
    }

    Ok(url)
}

/// Path of `resource_url` exactly as written.
///
/// `Url` normalizes paths (`\` becomes `/`, `..` segments are collapsed),
/// which would sign a different object.
fn raw_path(resource_url: &str) -> &str {
    let rest = resource_url
        .split_once(':')
        .map_or(resource_url, |(_, rest)| rest);
    let rest = match rest.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find(['/', '?', '#'])
            .map_or("", |idx| &authority_and_path[idx..]),
        None => rest,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn expires_at(now: DateTime, expires_in: Expiry) -> Result<i64> {
    let delta = chrono::TimeDelta::from_std(expires_in.as_duration())
        .map_err(|e| Error::config_invalid("expiry is too large").with_source(e))?;
    let expires_at = now
        .checked_add_signed(delta)
        .ok_or_else(|| Error::config_invalid("expiry is too large"))?;

    Ok(expires_at.timestamp())
}
