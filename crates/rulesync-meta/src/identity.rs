//! Process identity.
//!
//! Everything the transport needs to know about this process: tenant and
//! network placement, host facts, the selected endpoint, and the session
//! token once the transport has authenticated. Built once by
//! [`crate::bootstrap`] and shared as `Arc<ProcessIdentity>`.

use std::fmt;

use parking_lot::RwLock;
use rulesync_constants::meta::SDK_KIND;
use rulesync_constants::meta::SDK_VERSION;

use crate::error::Result;
use crate::session::SessionTokenPromise;

/// How the identity's network placement was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BootstrapPath {
    /// No license; placement came from the discovery service.
    Discovery,
    /// A license was configured; host facts were resolved locally.
    #[default]
    License,
}

impl fmt::Display for BootstrapPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapPath::Discovery => f.write_str("discovery"),
            BootstrapPath::License => f.write_str("license"),
        }
    }
}

/// Facts fixed at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFacts {
    pub license: String,
    pub namespace: String,
    pub deploy_env: String,
    pub path: BootstrapPath,
    pub region_id: String,
    pub network_id: String,
    pub local_ip: String,
    pub host_name: String,
    pub process_id: String,
    pub instance_id: String,
    pub endpoint: String,
    pub sdk_version: String,
    pub debugging: bool,
}

impl Default for IdentityFacts {
    fn default() -> Self {
        Self {
            license: String::new(),
            namespace: String::new(),
            deploy_env: String::new(),
            path: BootstrapPath::default(),
            region_id: String::new(),
            network_id: String::new(),
            local_ip: String::new(),
            host_name: String::new(),
            process_id: String::new(),
            instance_id: String::new(),
            endpoint: String::new(),
            sdk_version: SDK_VERSION.to_string(),
            debugging: false,
        }
    }
}

/// Identity of this process as seen by the rule console.
///
/// Bootstrap facts are immutable. The tenant id and connection id are
/// assigned later by the transport layer; the session token is published
/// exactly once through [`ProcessIdentity::session`].
#[derive(Debug)]
pub struct ProcessIdentity {
    facts: IdentityFacts,
    tenant_id: RwLock<String>,
    cid: RwLock<String>,
    session: SessionTokenPromise,
}

impl ProcessIdentity {
    /// Identity from resolved facts and the tenant known at bootstrap.
    pub fn new(facts: IdentityFacts, tenant_id: impl Into<String>) -> Self {
        Self {
            facts,
            tenant_id: RwLock::new(tenant_id.into()),
            cid: RwLock::new(String::new()),
            session: SessionTokenPromise::new(),
        }
    }

    /// All facts resolved at bootstrap.
    pub fn facts(&self) -> &IdentityFacts {
        &self.facts
    }

    /// License key; empty on the discovery path.
    pub fn license(&self) -> &str {
        &self.facts.license
    }

    /// Rule namespace, `default` unless configured.
    pub fn namespace(&self) -> &str {
        &self.facts.namespace
    }

    /// Deployment environment used for endpoint selection.
    pub fn deploy_env(&self) -> &str {
        &self.facts.deploy_env
    }

    /// Which bootstrap path produced this identity.
    pub fn bootstrap_path(&self) -> BootstrapPath {
        self.facts.path
    }

    /// True iff placement came from the discovery service.
    pub fn is_private_network(&self) -> bool {
        self.facts.path == BootstrapPath::Discovery
    }

    /// Region the process runs in.
    pub fn region_id(&self) -> &str {
        &self.facts.region_id
    }

    /// Network id; the license itself on the license path.
    pub fn network_id(&self) -> &str {
        &self.facts.network_id
    }

    /// Local IPv4 address in dotted form.
    pub fn local_ip(&self) -> &str {
        &self.facts.local_ip
    }

    /// Host name; empty if it could not be read.
    pub fn host_name(&self) -> &str {
        &self.facts.host_name
    }

    /// Decimal process id.
    pub fn process_id(&self) -> &str {
        &self.facts.process_id
    }

    /// Instance id; the host name on the license path.
    pub fn instance_id(&self) -> &str {
        &self.facts.instance_id
    }

    /// Transport endpoint host selected for this environment and region.
    pub fn endpoint(&self) -> &str {
        &self.facts.endpoint
    }

    /// Agent version reported to the console.
    pub fn sdk_version(&self) -> &str {
        &self.facts.sdk_version
    }

    /// Fixed agent kind reported to the console.
    pub fn sdk_kind(&self) -> &'static str {
        SDK_KIND
    }

    /// Whether debug logging was requested.
    pub fn debug_enabled(&self) -> bool {
        self.facts.debugging
    }

    /// Tenant (user) id. Empty on the license path until the transport sets it.
    pub fn tenant_id(&self) -> String {
        self.tenant_id.read().clone()
    }

    /// Record the tenant id reported by the transport.
    pub fn set_tenant_id(&self, tenant_id: impl Into<String>) {
        *self.tenant_id.write() = tenant_id.into();
    }

    /// Connection id assigned by the transport after connecting.
    pub fn cid(&self) -> String {
        self.cid.read().clone()
    }

    /// Record the connection id reported by the transport.
    pub fn set_cid(&self, cid: impl Into<String>) {
        *self.cid.write() = cid.into();
    }

    /// Readiness promise for the transport session.
    pub fn session(&self) -> &SessionTokenPromise {
        &self.session
    }

    /// Session token, once delivered.
    pub fn session_token(&self) -> Option<String> {
        self.session.token()
    }

    /// Publish the session token. Succeeds once per identity.
    pub fn deliver_session_token(&self, token: impl Into<String>) -> Result<()> {
        self.session.deliver(token)
    }
}
