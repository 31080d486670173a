//! Fixed discovery and host facts.

use std::io;
use std::net::IpAddr;

use async_trait::async_trait;
use rulesync_meta::DiscoveryError;
use rulesync_meta::HostProbe;
use rulesync_meta::HostProbeError;
use rulesync_meta::NetworkInterface;
use rulesync_meta::NetworkMetadata;
use rulesync_meta::NetworkMetadataProvider;

/// Discovery service with a canned answer.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    metadata: Option<NetworkMetadata>,
}

impl StaticDiscovery {
    pub fn new(metadata: NetworkMetadata) -> Self {
        Self {
            metadata: Some(metadata),
        }
    }

    /// Discovery that always fails, as outside a private network.
    pub fn unavailable() -> Self {
        Self { metadata: None }
    }
}

#[async_trait]
impl NetworkMetadataProvider for StaticDiscovery {
    async fn retrieve_network_metadata(&self) -> Result<NetworkMetadata, DiscoveryError> {
        self.metadata.clone().ok_or_else(|| DiscoveryError::Unavailable {
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "metadata service unreachable"),
        })
    }
}

/// Host probe with fixed interfaces, host name and pid.
#[derive(Debug, Clone)]
pub struct FixedHostProbe {
    interfaces: Vec<NetworkInterface>,
    host_name: Option<String>,
    process_id: u32,
}

impl FixedHostProbe {
    /// Loopback plus one active `eth0` carrying `addresses`.
    pub fn with_addresses(addresses: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            interfaces: vec![
                NetworkInterface {
                    name: "lo".into(),
                    is_up: true,
                    is_loopback: true,
                    addresses: vec![IpAddr::from([127, 0, 0, 1])],
                },
                NetworkInterface {
                    name: "eth0".into(),
                    is_up: true,
                    is_loopback: false,
                    addresses: addresses.into_iter().collect(),
                },
            ],
            host_name: Some("test-host".into()),
            process_id: 1000,
        }
    }

    /// Only a loopback interface.
    pub fn loopback_only() -> Self {
        Self::with_addresses([])
    }

    /// Replace the interface list.
    pub fn with_interfaces(mut self, interfaces: Vec<NetworkInterface>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// `None` makes `host_name` fail.
    pub fn with_host_name(mut self, host_name: Option<&str>) -> Self {
        self.host_name = host_name.map(str::to_string);
        self
    }

    pub fn with_process_id(mut self, process_id: u32) -> Self {
        self.process_id = process_id;
        self
    }
}

impl HostProbe for FixedHostProbe {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, HostProbeError> {
        Ok(self.interfaces.clone())
    }

    fn host_name(&self) -> Result<String, HostProbeError> {
        self.host_name.clone().ok_or_else(|| HostProbeError::HostName {
            source: io::Error::new(io::ErrorKind::NotFound, "host name unavailable"),
        })
    }

    fn process_id(&self) -> u32 {
        self.process_id
    }
}
