//! Process identity for the rulesync agent.
//!
//! Resolves who this process is before any rule can be synchronized:
//! tenant and network placement ([`bootstrap`]), the transport endpoint
//! ([`EndpointTable`]), and the session token the transport publishes once it
//! has authenticated ([`SessionTokenPromise`], [`await_session`]).
//!
//! Host facts and network discovery sit behind the [`HostProbe`] and
//! [`NetworkMetadataProvider`] traits so bootstrap can run against fakes.
//!
//! [`EndpointTable::builtin`] only carries placeholder `*.internal` hosts for
//! the `prod` regions. Deployments override them with their own entries.

pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod identity;
pub mod resolver;
pub mod session;

pub use discovery::DiscoveryError;
pub use discovery::NetworkMetadata;
pub use discovery::NetworkMetadataProvider;
pub use endpoint::EndpointEntry;
pub use endpoint::EndpointTable;
pub use endpoint::endpoint_key;
pub use error::MetaError;
pub use error::Result;
pub use host::HostProbe;
pub use host::HostProbeError;
pub use host::NetworkInterface;
pub use host::SystemHostProbe;
pub use host::first_routeable_ipv4;
pub use identity::BootstrapPath;
pub use identity::IdentityFacts;
pub use identity::ProcessIdentity;
pub use resolver::BootstrapRequest;
pub use resolver::bootstrap;
pub use session::SessionTokenPromise;
pub use session::await_session;
