//! Network metadata discovery.
//!
//! Processes started without a license run inside a private network whose
//! metadata service knows the tenant, region and host placement.

use async_trait::async_trait;
use snafu::Snafu;

/// Placement facts reported by the discovery service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMetadata {
    /// Owning tenant. Empty means the service has no tenant for this host.
    pub tenant_id: String,
    pub region_id: String,
    pub network_id: String,
    pub ip: String,
    pub host_name: String,
    pub instance_id: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DiscoveryError {
    /// The service could not be reached or answered with an error.
    #[snafu(display("discovery service unavailable: {}", source))]
    Unavailable { source: std::io::Error },

    /// The service answered without a tenant id.
    #[snafu(display("discovery service returned no tenant id"))]
    MissingTenant,
}

/// Client for the network metadata service.
#[async_trait]
pub trait NetworkMetadataProvider: Send + Sync {
    async fn retrieve_network_metadata(&self) -> Result<NetworkMetadata, DiscoveryError>;
}

#[async_trait]
impl<T: NetworkMetadataProvider + ?Sized> NetworkMetadataProvider for std::sync::Arc<T> {
    async fn retrieve_network_metadata(&self) -> Result<NetworkMetadata, DiscoveryError> {
        (**self).retrieve_network_metadata().await
    }
}
