pub mod lsn;
pub mod replag_error;
pub mod replication_row;
pub mod standby_health;
