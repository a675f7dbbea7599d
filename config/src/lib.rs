//! Configuration for the document replicator.
//!
//! The [`shared`] module maps loosely-typed JSON replicator requests onto a validated
//! [`shared::ReplicationConfig`] and resolves it against the local database catalog and
//! certificate assets. The loader in this crate reads the service settings of the
//! replicator binary itself.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config, load_config_from};
