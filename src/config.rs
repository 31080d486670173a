use std::path::Path;

use rulesync_constants::meta::DEFAULT_DEPLOY_ENV;
use rulesync_constants::meta::DEFAULT_NAMESPACE;
use rulesync_datasource::DatasourceConfig;
use rulesync_meta::BootstrapRequest;
use rulesync_meta::EndpointTable;
use serde::Deserialize;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::ConfigError;
use crate::error::ParseTomlSnafu;
use crate::error::ReadFileSnafu;

/// Agent configuration.
///
/// Configuration is loaded in layers with the following precedence (lowest to highest):
/// 1. Environment variables (RULESYNC_*)
/// 2. TOML configuration file
/// 3. Explicit overrides from the embedding process
///
/// A field in a higher layer wins only when it differs from its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Tenant license. Empty means the process runs inside a private network
    /// and takes its identity from the discovery service.
    #[serde(default)]
    pub license: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Deploy environment, first half of the endpoint table key.
    #[serde(default = "default_deploy_env")]
    pub deploy_env: String,

    /// Application whose rules are synchronized. Required.
    #[serde(default)]
    pub app_name: String,

    /// Connect to the TLS endpoint.
    #[serde(default)]
    pub secure_transport: bool,

    #[serde(default)]
    pub debugging: bool,

    #[serde(default)]
    pub datasource: DatasourceConfig,

    /// Extra endpoint table entries. Later entries replace earlier ones and the
    /// built-in table.
    #[serde(default)]
    pub endpoints: Vec<EndpointOverride>,
}

/// One `[[endpoints]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverride {
    /// `<env>-<region>` key.
    pub key: String,
    #[serde(default)]
    pub insecure: String,
    #[serde(default)]
    pub secure: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            license: String::new(),
            namespace: default_namespace(),
            deploy_env: default_deploy_env(),
            app_name: String::new(),
            secure_transport: false,
            debugging: false,
            datasource: DatasourceConfig::default(),
            endpoints: Vec::new(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        toml::from_str(&content).context(ParseTomlSnafu { path })
    }

    /// Load configuration from the process environment.
    ///
    /// Variables follow the pattern RULESYNC_<FIELD_NAME>; datasource fields
    /// drop their table prefix (RULESYNC_TIMEOUT_MS). Endpoint entries are
    /// file-only.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`AgentConfig::from_env`], reading variables through `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str| lookup(key).unwrap_or_default();
        let defaults = DatasourceConfig::default();
        Self {
            license: string("RULESYNC_LICENSE"),
            namespace: lookup("RULESYNC_NAMESPACE").unwrap_or_else(default_namespace),
            deploy_env: lookup("RULESYNC_DEPLOY_ENV").unwrap_or_else(default_deploy_env),
            app_name: string("RULESYNC_APP_NAME"),
            secure_transport: parse_value(&lookup, "RULESYNC_SECURE_TRANSPORT").unwrap_or(false),
            debugging: parse_value(&lookup, "RULESYNC_DEBUG").unwrap_or(false),
            datasource: DatasourceConfig {
                timeout_ms: parse_value(&lookup, "RULESYNC_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
                listen_interval_ms: parse_value(&lookup, "RULESYNC_LISTEN_INTERVAL_MS")
                    .unwrap_or(defaults.listen_interval_ms),
                transport_port: parse_value(&lookup, "RULESYNC_TRANSPORT_PORT").unwrap_or(defaults.transport_port),
                session_wait_timeout_ms: parse_value(&lookup, "RULESYNC_SESSION_WAIT_TIMEOUT_MS")
                    .unwrap_or(defaults.session_wait_timeout_ms),
            },
            endpoints: Vec::new(),
        }
    }

    /// Build the layered configuration and validate it.
    ///
    /// Reads the environment, then `path` if given, then `overrides`.
    pub fn load(path: Option<&Path>, overrides: Option<Self>) -> Result<Self, ConfigError> {
        let mut config = Self::from_env();
        if let Some(path) = path {
            config.merge(Self::from_toml_file(path)?);
        }
        if let Some(overrides) = overrides {
            config.merge(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    /// Merge configuration from another source.
    ///
    /// Fields in `other` that are non-default override fields in `self`;
    /// endpoint entries are appended.
    pub fn merge(&mut self, other: Self) {
        if !other.license.is_empty() {
            self.license = other.license;
        }
        if other.namespace != default_namespace() {
            self.namespace = other.namespace;
        }
        if other.deploy_env != default_deploy_env() {
            self.deploy_env = other.deploy_env;
        }
        if !other.app_name.is_empty() {
            self.app_name = other.app_name;
        }
        if other.secure_transport {
            self.secure_transport = true;
        }
        if other.debugging {
            self.debugging = true;
        }
        self.datasource.merge(other.datasource);
        self.endpoints.extend(other.endpoints);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "app_name must be set".into(),
            });
        }

        if self.namespace.is_empty() {
            return Err(ConfigError::Validation {
                message: "namespace must not be empty".into(),
            });
        }

        if self.deploy_env.is_empty() {
            return Err(ConfigError::Validation {
                message: "deploy_env must not be empty".into(),
            });
        }

        if let Some(index) = self.endpoints.iter().position(|entry| entry.key.is_empty()) {
            return Err(ConfigError::Validation {
                message: format!("endpoints[{index}] has an empty key"),
            });
        }

        self.datasource.validate().map_err(|err| ConfigError::Validation {
            message: err.to_string(),
        })
    }

    /// Built-in endpoint table with the configured entries applied.
    pub fn endpoint_table(&self) -> EndpointTable {
        let mut table = EndpointTable::builtin();
        for entry in &self.endpoints {
            table.insert(entry.key.clone(), entry.insecure.clone(), entry.secure.clone());
        }
        table
    }

    pub fn bootstrap_request(&self) -> BootstrapRequest {
        BootstrapRequest {
            license: self.license.clone(),
            namespace: self.namespace.clone(),
            deploy_env: self.deploy_env.clone(),
            secure_transport: self.secure_transport,
            debugging: self.debugging,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_deploy_env() -> String {
    DEFAULT_DEPLOY_ENV.to_string()
}

fn parse_value<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key)?.trim().parse().ok()
}
