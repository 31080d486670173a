//! Rule synchronization over a config-push transport.
//!
//! Once the process identity has a session token, [`start_sync`] subscribes
//! to the four rule documents of this application and wires each one to a
//! [`RuleChangeListener`]. Every published document fully replaces the
//! category's rule set in the [`RuleEngine`].
//!
//! The transport, its sessions and the rule engine are traits; this crate
//! ships no network client.
//!
//! ```text
//! await_session -> create_session -> subscribe x4
//!                                        |
//!                    on_change -> translate -> RuleEngine::replace_*
//! ```

pub mod config;
pub mod data_id;
pub mod engine;
pub mod error;
pub mod listener;
pub mod sync;
pub mod transport;

pub use config::DatasourceConfig;
pub use data_id::data_id;
pub use data_id::data_id_prefix;
pub use engine::RuleEngine;
pub use engine::RuleEngineError;
pub use error::Result;
pub use error::SyncError;
pub use listener::ApplyOutcome;
pub use listener::RuleChangeListener;
pub use sync::Subscription;
pub use sync::SyncHandle;
pub use sync::start_sync;
pub use transport::ChangeListener;
pub use transport::ConfigSession;
pub use transport::ConfigTransport;
pub use transport::SessionConfig;
pub use transport::TransportError;
