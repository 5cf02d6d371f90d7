use chrono::{DateTime, Local};
use tokio_postgres::types::PgLsn;

/// Snapshot of a standby's recovery progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StandbyHealth {
    pub recovery: bool,
    pub replay_paused: Option<bool>,
    pub last_recv_lsn: Option<PgLsn>,
    pub last_replay_lsn: Option<PgLsn>,
    pub last_replay_ts: Option<DateTime<Local>>,
    /// 0 when everything received has been replayed, otherwise seconds since
    /// the last replayed transaction.
    pub delay_seconds: Option<f64>,
}

impl StandbyHealth {
    /// Only an exact zero counts as caught up; an unknown delay does not.
    pub fn has_replay_delay(&self) -> bool {
        self.delay_seconds != Some(0.0)
    }
}

/// Human readable byte distance as returned by `pg_size_pretty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagSize(pub String);
