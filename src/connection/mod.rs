//! Connection seam between the lag checker and the database driver.

pub(crate) mod connection_params;
pub(crate) mod pg_session;

pub use connection_params::ConnectionParams;
pub use pg_session::{PgConnector, PgSession};

use crate::shared::replag_error::ReplagResult;
use crate::shared::replication_row::ReplicationRow;
use crate::shared::standby_health::{LagSize, StandbyHealth};
use async_trait::async_trait;
use tokio_postgres::types::PgLsn;

/// Opens sessions to a server described by [`ConnectionParams`].
#[async_trait]
pub trait Connector: Send + Sync {
    /// Fails with [`ReplagError::Connection`](crate::ReplagError::Connection).
    async fn connect(&self, params: &ConnectionParams) -> ReplagResult<Box<dyn Session>>;
}

/// One open connection. Every query method receives the SQL text chosen by
/// the connection's dialect and decodes the fixed column layout that SQL
/// produces.
#[async_trait]
pub trait Session: Send + Sync {
    /// Host this session was opened against.
    fn host(&self) -> &str;

    async fn server_version_num(&self) -> ReplagResult<i32>;

    async fn replication_rows(&self, sql: &str) -> ReplagResult<Vec<ReplicationRow>>;

    /// Fails when the query errors or returns no row.
    async fn current_position(&self, sql: &str) -> ReplagResult<PgLsn>;

    async fn standby_health(&self, sql: &str) -> ReplagResult<StandbyHealth>;

    async fn lag_size(&self, sql: &str) -> ReplagResult<LagSize>;

    async fn close(self: Box<Self>);
}
