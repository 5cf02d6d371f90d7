//! Looks for PostgreSQL streaming replication lag.
//!
//! The primary is asked for its replicas and its current write position,
//! then every replica address is visited in turn to read how far its replay
//! trails behind, in seconds and in bytes.

pub mod clap_parser;
pub mod connection;
pub mod dialect;
pub mod inspector;
pub mod lag_checker;
pub mod reporter;
pub mod settings;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{ConnectionParams, Connector, PgConnector, Session};
pub use dialect::{Dialect, ServerVersionTag};
pub use lag_checker::{LagChecker, RunSummary};
pub use reporter::{Reporter, TableReporter};
pub use tokio_postgres::types::PgLsn;
pub use shared::replag_error::{ReplagError, ReplagResult};
