//! Replicator request mapping, validation and resolution.

mod authenticator;
mod base;
mod fields;
mod replication;
mod resolve;
mod settings;

pub use authenticator::*;
pub use base::*;
pub use replication::*;
pub use resolve::*;
pub use settings::*;
