//! Identity bootstrap.
//!
//! Exactly one of two paths fills in the network placement:
//!
//! - **discovery**: no license is configured, so the process must be inside a private network whose
//!   metadata service reports tenant, region, network and host.
//! - **license**: the license doubles as the network id; the address and host name are resolved
//!   locally and the region is the public one. The tenant id arrives later from the transport.
//!
//! Both paths then pick a transport endpoint for `<env>-<region>`.

use rulesync_constants::meta::DEFAULT_PUBLIC_REGION;
use rulesync_constants::meta::SDK_VERSION;
use snafu::OptionExt;
use snafu::ResultExt;
use tracing::info;
use tracing::warn;

use crate::discovery::MissingTenantSnafu;
use crate::discovery::NetworkMetadataProvider;
use crate::endpoint::EndpointTable;
use crate::error::DiscoveryUnavailableSnafu;
use crate::error::InterfaceEnumerationSnafu;
use crate::error::NoRouteableAddressSnafu;
use crate::error::Result;
use crate::host::HostProbe;
use crate::host::first_routeable_ipv4;
use crate::identity::BootstrapPath;
use crate::identity::IdentityFacts;
use crate::identity::ProcessIdentity;

/// Inputs to [`bootstrap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapRequest {
    /// Tenant license; empty selects the discovery path.
    pub license: String,
    pub namespace: String,
    pub deploy_env: String,
    /// Use the TLS endpoint.
    pub secure_transport: bool,
    pub debugging: bool,
}

/// Resolve the process identity.
///
/// # Errors
///
/// - [`crate::MetaError::DiscoveryUnavailable`] if no license is set and discovery fails or reports no tenant.
/// - [`crate::MetaError::InterfaceEnumeration`] or [`crate::MetaError::NoRouteableAddress`] if a license is set
///   and no local IPv4 address can be found.
/// - [`crate::MetaError::UnsupportedEnvironment`] if the endpoint table has no usable host.
pub async fn bootstrap<D, H>(
    request: &BootstrapRequest,
    discovery: &D,
    host: &H,
    endpoints: &EndpointTable,
) -> Result<ProcessIdentity>
where
    D: NetworkMetadataProvider + ?Sized,
    H: HostProbe + ?Sized,
{
    let process_id = host.process_id().to_string();

    let (facts, tenant_id) = if request.license.is_empty() {
        let metadata = discovery
            .retrieve_network_metadata()
            .await
            .and_then(|metadata| {
                if metadata.tenant_id.is_empty() {
                    MissingTenantSnafu.fail()
                } else {
                    Ok(metadata)
                }
            })
            .context(DiscoveryUnavailableSnafu)?;
        let facts = IdentityFacts {
            path: BootstrapPath::Discovery,
            region_id: metadata.region_id,
            network_id: metadata.network_id,
            local_ip: metadata.ip,
            host_name: metadata.host_name,
            instance_id: metadata.instance_id,
            process_id,
            ..base_facts(request)
        };
        (facts, metadata.tenant_id)
    } else {
        let interfaces = host.interfaces().context(InterfaceEnumerationSnafu)?;
        let local_ip = first_routeable_ipv4(&interfaces).context(NoRouteableAddressSnafu)?;
        let host_name = host.host_name().unwrap_or_else(|err| {
            warn!(error = %err, "failed to resolve host name");
            String::new()
        });
        let facts = IdentityFacts {
            path: BootstrapPath::License,
            region_id: DEFAULT_PUBLIC_REGION.to_string(),
            network_id: request.license.clone(),
            local_ip: local_ip.to_string(),
            instance_id: host_name.clone(),
            host_name,
            process_id,
            ..base_facts(request)
        };
        (facts, String::new())
    };

    let endpoint = endpoints.resolve_endpoint(&request.deploy_env, &facts.region_id, request.secure_transport)?;
    let facts = IdentityFacts { endpoint, ..facts };

    info!(
        path = %facts.path,
        region_id = %facts.region_id,
        local_ip = %facts.local_ip,
        endpoint = %facts.endpoint,
        "process identity resolved"
    );
    Ok(ProcessIdentity::new(facts, tenant_id))
}

fn base_facts(request: &BootstrapRequest) -> IdentityFacts {
    IdentityFacts {
        license: request.license.clone(),
        namespace: request.namespace.clone(),
        deploy_env: request.deploy_env.clone(),
        sdk_version: SDK_VERSION.to_string(),
        debugging: request.debugging,
        ..IdentityFacts::default()
    }
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::net::Ipv4Addr;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;
    use crate::discovery::DiscoveryError;
    use crate::discovery::NetworkMetadata;
    use crate::error::MetaError;
    use crate::host::HostProbeError;
    use crate::host::NetworkInterface;

    struct Discovery(Option<NetworkMetadata>);

    #[async_trait]
    impl NetworkMetadataProvider for Discovery {
        async fn retrieve_network_metadata(&self) -> std::result::Result<NetworkMetadata, DiscoveryError> {
            self.0.clone().ok_or_else(|| DiscoveryError::Unavailable {
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            })
        }
    }

    struct Host {
        addresses: Vec<IpAddr>,
        host_name: Option<String>,
        interfaces_fail: bool,
        interface_calls: AtomicUsize,
    }

    impl HostProbe for Host {
        fn interfaces(&self) -> std::result::Result<Vec<NetworkInterface>, HostProbeError> {
            self.interface_calls.fetch_add(1, Ordering::SeqCst);
            if self.interfaces_fail {
                return Err(HostProbeError::ListInterfaces {
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            Ok(vec![
                NetworkInterface {
                    name: "lo".into(),
                    is_up: true,
                    is_loopback: true,
                    addresses: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
                },
                NetworkInterface {
                    name: "eth0".into(),
                    is_up: true,
                    is_loopback: false,
                    addresses: self.addresses.clone(),
                },
            ])
        }

        fn host_name(&self) -> std::result::Result<String, HostProbeError> {
            self.host_name.clone().ok_or_else(|| HostProbeError::HostName {
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn process_id(&self) -> u32 {
            4242
        }
    }

    fn unused_discovery() -> Discovery {
        Discovery(None)
    }

    fn host_with(addresses: &[Ipv4Addr]) -> Host {
        Host {
            addresses: addresses.iter().copied().map(IpAddr::V4).collect(),
            host_name: Some("web-01".into()),
            interfaces_fail: false,
            interface_calls: AtomicUsize::new(0),
        }
    }

    fn license_request() -> BootstrapRequest {
        BootstrapRequest {
            license: "lic-abc".into(),
            namespace: "default".into(),
            deploy_env: "prod".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_license_path() {
        let host = host_with(&[Ipv4Addr::new(10, 0, 0, 7)]);
        let identity = bootstrap(&license_request(), &unused_discovery(), &host, &EndpointTable::builtin())
            .await
            .unwrap();

        assert_eq!(identity.bootstrap_path(), BootstrapPath::License);
        assert!(!identity.is_private_network());
        assert_eq!(identity.region_id(), "cn-public");
        assert_eq!(identity.network_id(), "lic-abc");
        assert_eq!(identity.local_ip(), "10.0.0.7");
        assert_eq!(identity.host_name(), "web-01");
        assert_eq!(identity.instance_id(), "web-01");
        assert_eq!(identity.process_id(), "4242");
        assert_eq!(identity.tenant_id(), "");
        assert_eq!(identity.endpoint(), "rulesync-proxy.cn-public.internal");
        assert_eq!(identity.sdk_version(), SDK_VERSION);
    }

    #[tokio::test]
    async fn test_license_path_without_routeable_address() {
        let host = host_with(&[Ipv4Addr::UNSPECIFIED]);
        let err = bootstrap(&license_request(), &unused_discovery(), &host, &EndpointTable::builtin())
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::NoRouteableAddress));
    }

    #[tokio::test]
    async fn test_host_name_failure_is_not_fatal() {
        let host = Host {
            host_name: None,
            ..host_with(&[Ipv4Addr::new(192, 168, 0, 2)])
        };
        let identity = bootstrap(&license_request(), &unused_discovery(), &host, &EndpointTable::builtin())
            .await
            .unwrap();
        assert_eq!(identity.host_name(), "");
        assert_eq!(identity.instance_id(), "");
    }

    #[tokio::test]
    async fn test_discovery_path() {
        let discovery = Discovery(Some(NetworkMetadata {
            tenant_id: "uid-9".into(),
            region_id: "cn-hangzhou".into(),
            network_id: "vpc-1".into(),
            ip: "172.16.1.1".into(),
            host_name: "ecs-host".into(),
            instance_id: "i-123".into(),
        }));
        let request = BootstrapRequest {
            deploy_env: "prod".into(),
            secure_transport: true,
            ..Default::default()
        };
        let host = host_with(&[]);
        let identity = bootstrap(&request, &discovery, &host, &EndpointTable::builtin()).await.unwrap();
        assert_eq!(host.interface_calls.load(Ordering::SeqCst), 0);

        assert!(identity.is_private_network());
        assert_eq!(identity.tenant_id(), "uid-9");
        assert_eq!(identity.region_id(), "cn-hangzhou");
        assert_eq!(identity.network_id(), "vpc-1");
        assert_eq!(identity.local_ip(), "172.16.1.1");
        assert_eq!(identity.instance_id(), "i-123");
        assert_eq!(identity.process_id(), "4242");
        assert_eq!(identity.endpoint(), "rulesync-proxy-tls.cn-hangzhou.internal");
    }

    #[tokio::test]
    async fn test_discovery_failures() {
        let request = BootstrapRequest {
            deploy_env: "prod".into(),
            ..Default::default()
        };
        let err = bootstrap(&request, &unused_discovery(), &host_with(&[]), &EndpointTable::builtin())
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::DiscoveryUnavailable { .. }));

        let empty_tenant = Discovery(Some(NetworkMetadata {
            region_id: "cn-hangzhou".into(),
            ..Default::default()
        }));
        let err = bootstrap(&request, &empty_tenant, &host_with(&[]), &EndpointTable::builtin()).await.unwrap_err();
        assert!(matches!(err, MetaError::DiscoveryUnavailable {
            source: DiscoveryError::MissingTenant
        }));
    }

    #[tokio::test]
    async fn test_unsupported_environment() {
        let request = BootstrapRequest {
            deploy_env: "staging".into(),
            ..license_request()
        };
        let host = host_with(&[Ipv4Addr::new(10, 0, 0, 7)]);
        let err = bootstrap(&request, &unused_discovery(), &host, &EndpointTable::builtin()).await.unwrap_err();
        assert!(matches!(err, MetaError::UnsupportedEnvironment { ref key } if key == "staging-cn-public"));
    }

    #[tokio::test]
    async fn test_license_path_interface_enumeration_failure() {
        let host = Host {
            interfaces_fail: true,
            ..host_with(&[Ipv4Addr::new(10, 0, 0, 7)])
        };
        let err = bootstrap(&license_request(), &unused_discovery(), &host, &EndpointTable::builtin())
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::InterfaceEnumeration {
            source: HostProbeError::ListInterfaces { .. }
        }));
        assert_eq!(host.interface_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discovery_path_ignores_failing_interfaces() {
        let discovery = Discovery(Some(NetworkMetadata {
            tenant_id: "uid-1".into(),
            region_id: "cn-beijing".into(),
            ..Default::default()
        }));
        let host = Host {
            interfaces_fail: true,
            ..host_with(&[])
        };
        let request = BootstrapRequest {
            deploy_env: "prod".into(),
            ..Default::default()
        };
        let identity = bootstrap(&request, &discovery, &host, &EndpointTable::builtin()).await.unwrap();
        assert_eq!(identity.bootstrap_path(), BootstrapPath::Discovery);
        assert_eq!(host.interface_calls.load(Ordering::SeqCst), 0);
    }
}
