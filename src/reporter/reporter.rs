use crate::dialect::Dialect;
use crate::shared::replag_error::ReplagError;
use crate::shared::replication_row::ReplicationRow;
use crate::shared::standby_health::{LagSize, StandbyHealth};
use tokio_postgres::types::PgLsn;

/// Everything the lag checker shows to the user goes through here.
pub trait Reporter {
    fn server_version(&mut self, server_version_num: i32);

    fn primary(&mut self, host: &str);

    fn replication_table(&mut self, dialect: &Dialect, rows: &[ReplicationRow]);

    fn no_replication(&mut self);

    fn current_position(&mut self, dialect: &Dialect, position: &PgLsn);

    fn standby(&mut self, address: &str);

    fn standby_health(&mut self, dialect: &Dialect, health: &StandbyHealth);

    fn lag_size(&mut self, dialect: &Dialect, size: &LagSize);

    fn unreachable_standby(&mut self, address: &str, error: &ReplagError);

    fn standby_failure(&mut self, address: &str, error: &ReplagError);

    fn lag_size_failure(&mut self, address: &str, error: &ReplagError);
}
