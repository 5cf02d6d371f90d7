use std::net::IpAddr;
use tokio_postgres::types::PgLsn;

/// One active replica as registered in `pg_stat_replication` on the primary.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationRow {
    pub client_addr: Option<IpAddr>,
    pub state: Option<String>,
    pub sent_lsn: Option<PgLsn>,
    pub write_lsn: Option<PgLsn>,
    pub flush_lsn: Option<PgLsn>,
    pub replay_lsn: Option<PgLsn>,
    pub sync_state: Option<String>,
    pub sync_priority: Option<i32>,
}

impl ReplicationRow {
    /// Address used to reach the standby, empty for a Unix socket client.
    pub fn standby_address(&self) -> String {
        self.client_addr
            .map(|addr| addr.to_string())
            .unwrap_or_default()
    }
}

/// Standby addresses in the order the primary returned them, duplicates kept.
pub fn standby_addresses(rows: &[ReplicationRow]) -> Vec<String> {
    rows.iter().map(ReplicationRow::standby_address).collect()
}
