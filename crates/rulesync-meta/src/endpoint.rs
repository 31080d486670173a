//! Transport endpoint selection.
//!
//! Endpoints are keyed by `<env>-<region>`. Each key maps to a plain and a
//! TLS host; which one is used depends on the secure-transport setting.

use std::collections::HashMap;

use rulesync_constants::meta::ENDPOINT_KEY_SEPARATOR;
use snafu::OptionExt;

use crate::error::Result;
use crate::error::UnsupportedEnvironmentSnafu;

/// Plain and TLS hosts for one environment/region pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointEntry {
    pub insecure: String,
    pub secure: String,
}

impl EndpointEntry {
    pub fn host(&self, secure: bool) -> &str {
        if secure { &self.secure } else { &self.insecure }
    }
}

/// Regions served out of the box in the `prod` environment.
const BUILTIN_PROD_REGIONS: &[&str] = &[
    "cn-public",
    "cn-hangzhou",
    "cn-shanghai",
    "cn-beijing",
    "cn-shenzhen",
    "cn-zhangjiakou",
    "cn-hongkong",
    "ap-southeast-1",
];

/// Lookup table from `<env>-<region>` to transport hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTable {
    entries: HashMap<String, EndpointEntry>,
}

/// Compose the table key for an environment and region.
pub fn endpoint_key(env: &str, region_id: &str) -> String {
    format!("{env}{ENDPOINT_KEY_SEPARATOR}{region_id}")
}

impl EndpointTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table shipped with the agent.
    ///
    /// Covers the `prod` environment only. Its hosts follow the
    /// `rulesync-proxy[-tls].<region>.internal` naming and are placeholders:
    /// a deployment must supply its real hosts as `[[endpoints]]` entries,
    /// which replace the builtin entry with the same key.
    pub fn builtin() -> Self {
        BUILTIN_PROD_REGIONS.iter().fold(Self::new(), |table, region| {
            table.with_entry(
                endpoint_key("prod", region),
                format!("rulesync-proxy.{region}.internal"),
                format!("rulesync-proxy-tls.{region}.internal"),
            )
        })
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, key: impl Into<String>, insecure: impl Into<String>, secure: impl Into<String>) -> Self {
        self.insert(key, insecure, secure);
        self
    }

    /// Add or replace an entry in place.
    pub fn insert(&mut self, key: impl Into<String>, insecure: impl Into<String>, secure: impl Into<String>) {
        self.entries.insert(key.into(), EndpointEntry {
            insecure: insecure.into(),
            secure: secure.into(),
        });
    }

    pub fn get(&self, key: &str) -> Option<&EndpointEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Host for the environment and region, or `None` if the pair is unsupported.
    ///
    /// A supported pair may still map to an empty host.
    pub fn select_endpoint(&self, env: &str, region_id: &str, secure: bool) -> Option<&str> {
        self.get(&endpoint_key(env, region_id)).map(|entry| entry.host(secure))
    }

    /// Like [`EndpointTable::select_endpoint`], but unsupported pairs and empty
    /// hosts are errors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MetaError::UnsupportedEnvironment`] carrying the composite key.
    pub fn resolve_endpoint(&self, env: &str, region_id: &str, secure: bool) -> Result<String> {
        self.select_endpoint(env, region_id, secure)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .context(UnsupportedEnvironmentSnafu {
                key: endpoint_key(env, region_id),
            })
    }
}
