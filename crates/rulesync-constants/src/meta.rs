//! Process metadata constants.

/// Version reported to the transport alongside the process identity.
pub const SDK_VERSION: &str = "1.0.3";

/// SDK flavour reported to the transport.
pub const SDK_KIND: &str = "RUST_SDK";

/// Region assigned to every process bootstrapped through a license key.
pub const DEFAULT_PUBLIC_REGION: &str = "cn-public";

/// Separator between the environment and region in endpoint table keys.
pub const ENDPOINT_KEY_SEPARATOR: &str = "-";

/// Deploy environment used when none is configured.
pub const DEFAULT_DEPLOY_ENV: &str = "prod";

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";
