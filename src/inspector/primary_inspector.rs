use crate::connection::Session;
use crate::dialect::Dialect;
use crate::shared::replag_error::ReplagResult;
use crate::shared::replication_row::ReplicationRow;
use tokio_postgres::types::PgLsn;
use tracing::debug;

/// Reads replication state from the primary. Any error here ends the run.
pub struct PrimaryInspector<'a> {
    session: &'a dyn Session,
    dialect: &'static Dialect,
}

impl<'a> PrimaryInspector<'a> {
    pub fn new(session: &'a dyn Session, dialect: &'static Dialect) -> Self {
        PrimaryInspector { session, dialect }
    }

    /// Replicas currently streaming from the primary, possibly none.
    pub async fn list_replicas(&self) -> ReplagResult<Vec<ReplicationRow>> {
        let rows = self
            .session
            .replication_rows(self.dialect.stat_replication)
            .await?;
        debug!(host = self.session.host(), replicas = rows.len(), "listed replicas");
        Ok(rows)
    }

    pub async fn current_position(&self) -> ReplagResult<PgLsn> {
        self.session
            .current_position(self.dialect.current_position)
            .await
    }
}
