//! Local host facts: network interfaces, host name, process id.

use std::net::IpAddr;
use std::net::Ipv4Addr;

use snafu::Snafu;

/// Failure reported by a [`HostProbe`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HostProbeError {
    #[snafu(display("failed to list interfaces: {}", source))]
    ListInterfaces { source: std::io::Error },

    #[snafu(display("failed to read host name: {}", source))]
    HostName { source: std::io::Error },

    #[snafu(display("host probing is not supported on this platform"))]
    UnsupportedPlatform,
}

/// One network interface and its addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub is_up: bool,
    pub is_loopback: bool,
    pub addresses: Vec<IpAddr>,
}

/// Source of host facts.
pub trait HostProbe: Send + Sync {
    /// List interfaces in OS order.
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, HostProbeError>;

    fn host_name(&self) -> Result<String, HostProbeError>;

    fn process_id(&self) -> u32 {
        std::process::id()
    }
}

impl<T: HostProbe + ?Sized> HostProbe for std::sync::Arc<T> {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, HostProbeError> {
        (**self).interfaces()
    }

    fn host_name(&self) -> Result<String, HostProbeError> {
        (**self).host_name()
    }

    fn process_id(&self) -> u32 {
        (**self).process_id()
    }
}

/// First usable IPv4 address on an active, non-loopback interface.
///
/// Interfaces and addresses are scanned in order. Loopback and unspecified
/// addresses are skipped; IPv4-mapped IPv6 addresses count as IPv4.
pub fn first_routeable_ipv4(interfaces: &[NetworkInterface]) -> Option<Ipv4Addr> {
    interfaces
        .iter()
        .filter(|iface| iface.is_up && !iface.is_loopback)
        .flat_map(|iface| iface.addresses.iter())
        .filter(|addr| !addr.is_loopback())
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(v6) => v6.to_ipv4_mapped(),
        })
        .find(|v4| !v4.is_unspecified() && !v4.is_loopback())
}

/// [`HostProbe`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostProbe;

#[cfg(unix)]
impl HostProbe for SystemHostProbe {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, HostProbeError> {
        use nix::net::if_::InterfaceFlags;
        use snafu::ResultExt;

        let addrs = nix::ifaddrs::getifaddrs().map_err(std::io::Error::from).context(ListInterfacesSnafu)?;

        let mut interfaces: Vec<NetworkInterface> = Vec::new();
        // One entry per (interface, address); fold them by name.
        for ifaddr in addrs {
            let address = ifaddr.address.as_ref().and_then(sockaddr_ip);
            let index = match interfaces.iter().position(|iface| iface.name == ifaddr.interface_name) {
                Some(index) => index,
                None => {
                    interfaces.push(NetworkInterface {
                        name: ifaddr.interface_name.clone(),
                        is_up: ifaddr.flags.contains(InterfaceFlags::IFF_UP),
                        is_loopback: ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK),
                        addresses: Vec::new(),
                    });
                    interfaces.len() - 1
                }
            };
            if let Some(address) = address {
                interfaces[index].addresses.push(address);
            }
        }
        Ok(interfaces)
    }

    fn host_name(&self) -> Result<String, HostProbeError> {
        use snafu::ResultExt;

        let name = nix::unistd::gethostname().map_err(std::io::Error::from).context(HostNameSnafu)?;
        Ok(name.to_string_lossy().into_owned())
    }
}

#[cfg(not(unix))]
impl HostProbe for SystemHostProbe {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, HostProbeError> {
        UnsupportedPlatformSnafu.fail()
    }

    fn host_name(&self) -> Result<String, HostProbeError> {
        UnsupportedPlatformSnafu.fail()
    }
}

#[cfg(unix)]
fn sockaddr_ip(addr: &nix::sys::socket::SockaddrStorage) -> Option<IpAddr> {
    if let Some(sin) = addr.as_sockaddr_in() {
        return Some(IpAddr::V4(*std::net::SocketAddrV4::from(*sin).ip()));
    }
    addr.as_sockaddr_in6().map(|sin6| IpAddr::V6(*std::net::SocketAddrV6::from(*sin6).ip()))
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use super::*;

    fn iface(name: &str, is_up: bool, is_loopback: bool, addresses: &[&str]) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            is_up,
            is_loopback,
            addresses: addresses.iter().map(|a| a.parse().unwrap()).collect(),
        }
    }

    #[test]
    fn test_skips_down_and_loopback_interfaces() {
        let interfaces = vec![
            iface("lo", true, true, &["127.0.0.1"]),
            iface("eth0", false, false, &["10.0.0.5"]),
            iface("eth1", true, false, &["fe80::1", "192.168.1.20", "192.168.1.21"]),
        ];
        assert_eq!(first_routeable_ipv4(&interfaces), Some(Ipv4Addr::new(192, 168, 1, 20)));
    }

    #[test]
    fn test_skips_unspecified_and_loopback_addresses() {
        let interfaces = vec![
            iface("weird", true, false, &["127.0.0.2", "0.0.0.0"]),
            iface("eth0", true, false, &["172.16.0.9"]),
        ];
        assert_eq!(first_routeable_ipv4(&interfaces), Some(Ipv4Addr::new(172, 16, 0, 9)));
    }

    #[test]
    fn test_mapped_ipv6_counts_as_ipv4() {
        let mapped = IpAddr::V6(Ipv4Addr::new(10, 1, 2, 3).to_ipv6_mapped());
        let interfaces = vec![NetworkInterface {
            name: "eth0".into(),
            is_up: true,
            is_loopback: false,
            addresses: vec![IpAddr::V6(Ipv6Addr::LOCALHOST), mapped],
        }];
        assert_eq!(first_routeable_ipv4(&interfaces), Some(Ipv4Addr::new(10, 1, 2, 3)));
    }

    #[test]
    fn test_no_routeable_address() {
        let interfaces = vec![iface("lo", true, true, &["127.0.0.1"]), iface("eth0", true, false, &["fe80::2"])];
        assert_eq!(first_routeable_ipv4(&interfaces), None);
        assert_eq!(first_routeable_ipv4(&[]), None);
    }

    #[test]
    fn test_host_errors_keep_their_source() {
        let err = HostProbeError::ListInterfaces {
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), std::io::Error::from(std::io::ErrorKind::PermissionDenied).to_string());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_probe_lists_interfaces() {
        let probe = SystemHostProbe;
        assert!(probe.interfaces().is_ok());
        assert_eq!(probe.process_id(), std::process::id());
    }
}
