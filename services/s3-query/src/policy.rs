//! Per-resource signing policy.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use presign_core::{Error, Result};
use serde::{Deserialize, Deserializer};

use crate::constants::{DEFAULT_EXPIRY_MINUTES, MAX_EXPIRY_MINUTES};

/// How long a signed url stays valid, in whole seconds.
///
/// An `Expiry` is never zero: inputs that truncate to zero seconds mean
/// "use the default" and are represented by `None` at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry {
    secs: u64,
}

impl Default for Expiry {
    fn default() -> Self {
        Self {
            secs: DEFAULT_EXPIRY_MINUTES * 60,
        }
    }
}

impl Expiry {
    /// Build from whole seconds, `None` for zero.
    pub fn from_secs(secs: u64) -> Option<Self> {
        (secs > 0).then_some(Self { secs })
    }

    /// Build from a possibly fractional number of minutes.
    ///
    /// The value is truncated to whole seconds, so `1.5` is 90 seconds and
    /// `0.001` is zero, which returns `None`. Negative and non-finite values
    /// are rejected, as are values above 100 years.
    pub fn from_minutes(minutes: f64) -> Result<Option<Self>> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(Error::config_invalid(format!(
                "expiry must be a non-negative number of minutes, got {minutes}"
            )));
        }
        if minutes > MAX_EXPIRY_MINUTES as f64 {
            return Err(Error::config_invalid(format!(
                "expiry must be at most {MAX_EXPIRY_MINUTES} minutes, got {minutes}"
            )));
        }

        Ok(Self::from_secs((minutes * 60.0) as u64))
    }

    /// Parse an operator-entered number of minutes.
    ///
    /// Empty input means "use the default" and returns `None`, the same as `0`.
    pub fn parse(minutes: &str) -> Result<Option<Self>> {
        let minutes = minutes.trim();
        if minutes.is_empty() {
            return Ok(None);
        }

        let value: f64 = minutes.parse().map_err(|e| {
            Error::config_invalid(format!("expiry '{minutes}' is not a number of minutes"))
                .with_source(e)
        })?;
        Self::from_minutes(value)
    }

    /// Whole seconds of this expiry.
    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    /// This expiry as a std duration.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.secs)
    }
}

/// Signing settings of a single resource.
///
/// Resources without a policy are never signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSigningPolicy {
    /// Whether urls of this resource should be signed.
    #[serde(default)]
    pub enabled: bool,
    /// Per-resource expiry, falls back to the configured default when `None`.
    #[serde(
        default,
        rename = "expires_in_minutes",
        deserialize_with = "deserialize_expiry"
    )]
    pub expires_in: Option<Expiry>,
}

impl ResourceSigningPolicy {
    /// A policy that signs with the default expiry.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            expires_in: None,
        }
    }

    /// A policy that never signs.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Override the expiry of this resource.
    pub fn with_expires_in(mut self, expires_in: Option<Expiry>) -> Self {
        self.expires_in = expires_in;
        self
    }
}

/// PolicyLookup resolves the signing policy of a resource owned by the host.
pub trait PolicyLookup: Debug + Send + Sync + 'static {
    /// Returns the policy for `resource_id`, `None` if the host has none.
    fn resource_policy(&self, resource_id: &str) -> Option<ResourceSigningPolicy>;
}

impl<T: PolicyLookup> PolicyLookup for Arc<T> {
    fn resource_policy(&self, resource_id: &str) -> Option<ResourceSigningPolicy> {
        self.as_ref().resource_policy(resource_id)
    }
}

impl PolicyLookup for HashMap<String, ResourceSigningPolicy> {
    fn resource_policy(&self, resource_id: &str) -> Option<ResourceSigningPolicy> {
        self.get(resource_id).copied()
    }
}

/// PolicyTable is an in-memory set of resource policies.
///
/// It can be loaded from TOML, every entry is validated at load time:
///
/// ```toml
/// [resources."42"]
/// enabled = true
/// expires_in_minutes = 5
///
/// [resources."43"]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyTable {
    #[serde(default)]
    resources: HashMap<String, ResourceSigningPolicy>,
}

impl PolicyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config_invalid("resource policies are malformed").with_source(e))
    }

    /// Set the policy of a resource.
    pub fn with_policy(
        mut self,
        resource_id: impl Into<String>,
        policy: ResourceSigningPolicy,
    ) -> Self {
        self.resources.insert(resource_id.into(), policy);
        self
    }

    /// Number of resources with a policy.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl PolicyLookup for PolicyTable {
    fn resource_policy(&self, resource_id: &str) -> Option<ResourceSigningPolicy> {
        self.resources.get(resource_id).copied()
    }
}

/// Deserialize minutes given either as a TOML number or a string.
pub(crate) fn deserialize_expiry<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Expiry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Minutes {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let expiry = match Minutes::deserialize(deserializer)? {
        Minutes::Integer(v) => Expiry::from_minutes(v as f64),
        Minutes::Float(v) => Expiry::from_minutes(v),
        Minutes::Text(v) => Expiry::parse(&v),
    };
    expiry.map_err(|e| serde::de::Error::custom(e.message()))
}
