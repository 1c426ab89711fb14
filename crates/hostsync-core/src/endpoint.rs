//! External-DNS protocol types
//!
//! [`Endpoint`] and [`Changes`] mirror the JSON shapes exchanged with an
//! external-dns controller over the webhook protocol. The core only interprets
//! `A` records; everything else is carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Record type for address records (IPv4 or IPv6 literal targets)
pub const RECORD_TYPE_A: &str = "A";

/// Provider-specific key/value attached to an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// A DNS record as seen by the orchestration controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified record name
    pub dns_name: String,

    /// Record targets; IP literals for `A` records
    #[serde(default, deserialize_with = "null_as_empty")]
    pub targets: Vec<String>,

    /// Record type (`A`, `CNAME`, `TXT`, ...)
    #[serde(default)]
    pub record_type: String,

    /// Identifier for multi-value routing policies
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// TTL in seconds (0 means unset)
    #[serde(default, rename = "recordTTL", skip_serializing_if = "is_zero")]
    pub record_ttl: i64,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

fn is_zero(ttl: &i64) -> bool {
    *ttl == 0
}

// Go controllers encode nil slices as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Endpoint {
    /// Create an endpoint with the given name, type, and targets
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            record_type: record_type.into(),
            set_identifier: String::new(),
            record_ttl: 0,
            labels: BTreeMap::new(),
            provider_specific: Vec::new(),
        }
    }

    /// Convenience constructor for an `A` record
    pub fn a_record<I, S>(dns_name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(dns_name, RECORD_TYPE_A, targets)
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.record_ttl = ttl;
        self
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Check if the record is an address record handled by the hosts file
    pub fn is_address_record(&self) -> bool {
        self.record_type == RECORD_TYPE_A
    }
}

/// A batch of record changes computed by the controller
///
/// An absent batch is represented by `Changes::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Changes {
    /// Records to create
    #[serde(default, deserialize_with = "null_as_empty")]
    pub create: Vec<Endpoint>,

    /// Previous values of updated records (not interpreted)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub update_old: Vec<Endpoint>,

    /// New values of updated records
    #[serde(default, deserialize_with = "null_as_empty")]
    pub update_new: Vec<Endpoint>,

    /// Records to delete
    #[serde(default, deserialize_with = "null_as_empty")]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Check if the batch carries any change
    ///
    /// Updates whose new values equal their old values do not count.
    pub fn has_changes(&self) -> bool {
        !self.create.is_empty() || !self.delete.is_empty() || self.update_new != self.update_old
    }

    /// Records whose targets are merged into the hosts file
    pub fn additions(&self) -> impl Iterator<Item = &Endpoint> {
        self.create.iter().chain(self.update_new.iter())
    }

    /// Records whose targets are removed from the hosts file
    pub fn removals(&self) -> impl Iterator<Item = &Endpoint> {
        self.delete.iter()
    }
}
