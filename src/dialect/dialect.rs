use crate::connection::Session;
use crate::shared::replag_error::ReplagResult;
use tokio_postgres::types::PgLsn;
use tracing::info;

/// First `server_version_num` using the PostgreSQL 10 names.
pub const MODERN_SERVER_VERSION_NUM: i32 = 100000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerVersionTag {
    Legacy,
    Modern,
}

impl ServerVersionTag {
    pub fn from_server_version(server_version_num: i32) -> Self {
        if server_version_num >= MODERN_SERVER_VERSION_NUM {
            ServerVersionTag::Modern
        } else {
            ServerVersionTag::Legacy
        }
    }
}

/// Queries and column names for one generation of the catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct Dialect {
    pub tag: ServerVersionTag,
    pub stat_replication: &'static str,
    pub replication_columns: [&'static str; 8],
    pub standby_health: &'static str,
    pub delay_column: &'static str,
    pub current_position: &'static str,
    pub position_label: &'static str,
    pub lsn_diff_function: &'static str,
    pub delay_size_column: &'static str,
}

// LSN columns are read as text: before 9.4 some of these functions returned
// text, afterwards pg_lsn. EXTRACT returns numeric from 14 on, hence float8.

static MODERN: Dialect = Dialect {
    tag: ServerVersionTag::Modern,
    stat_replication: "\
SELECT client_addr, state, sent_lsn::text, write_lsn::text, flush_lsn::text, \
replay_lsn::text, sync_state, sync_priority \
FROM pg_stat_replication",
    replication_columns: [
        "client_addr",
        "state",
        "sent_lsn",
        "write_lsn",
        "flush_lsn",
        "replay_lsn",
        "sync_state",
        "sync_priority",
    ],
    standby_health: "\
SELECT pg_is_in_recovery() AS recovery, \
pg_is_wal_replay_paused() AS replay_paused, \
pg_last_wal_receive_lsn()::text AS last_recv_lsn, \
pg_last_wal_replay_lsn()::text AS last_replay_lsn, \
pg_last_xact_replay_timestamp() AS last_replay_ts, \
(CASE \
WHEN pg_last_wal_receive_lsn() = pg_last_wal_replay_lsn() THEN 0 \
ELSE EXTRACT (EPOCH FROM now() - pg_last_xact_replay_timestamp()) \
END)::float8 AS wal_delay",
    delay_column: "wal_delay",
    current_position: "SELECT pg_current_wal_lsn()::text",
    position_label: "wal lsn",
    lsn_diff_function: "pg_wal_lsn_diff",
    delay_size_column: "wal_delay_size",
};

static LEGACY: Dialect = Dialect {
    tag: ServerVersionTag::Legacy,
    stat_replication: "\
SELECT client_addr, state, sent_location::text, write_location::text, \
flush_location::text, replay_location::text, sync_state, sync_priority \
FROM pg_stat_replication",
    replication_columns: [
        "client_addr",
        "state",
        "sent_location",
        "write_location",
        "flush_location",
        "replay_location",
        "sync_state",
        "sync_priority",
    ],
    standby_health: "\
SELECT pg_is_in_recovery() AS recovery, \
pg_is_xlog_replay_paused() AS replay_paused, \
pg_last_xlog_receive_location()::text AS last_recv_lsn, \
pg_last_xlog_replay_location()::text AS last_replay_lsn, \
pg_last_xact_replay_timestamp() AS last_replay_ts, \
(CASE \
WHEN pg_last_xlog_receive_location() = pg_last_xlog_replay_location() THEN 0 \
ELSE EXTRACT(EPOCH FROM now() - pg_last_xact_replay_timestamp()) \
END)::float8 AS xlog_delay",
    delay_column: "xlog_delay",
    current_position: "SELECT pg_current_xlog_location()::text",
    position_label: "xlog location",
    lsn_diff_function: "pg_xlog_location_diff",
    delay_size_column: "xlog_delay_size",
};

impl Dialect {
    pub fn for_tag(tag: ServerVersionTag) -> &'static Dialect {
        match tag {
            ServerVersionTag::Modern => &MODERN,
            ServerVersionTag::Legacy => &LEGACY,
        }
    }

    pub fn for_server_version(server_version_num: i32) -> &'static Dialect {
        Self::for_tag(ServerVersionTag::from_server_version(server_version_num))
    }

    /// Size of the log between `current` (primary) and `replayed` (standby).
    pub fn lag_size_query(&self, current: &PgLsn, replayed: &PgLsn) -> String {
        format!(
            "SELECT pg_size_pretty({}('{}', '{}')) AS {}",
            self.lsn_diff_function, current, replayed, self.delay_size_column
        )
    }
}

/// Reads the server version of a freshly opened connection and picks its dialect.
pub async fn detect_dialect(session: &dyn Session) -> ReplagResult<(i32, &'static Dialect)> {
    let server_version_num = session.server_version_num().await?;
    let dialect = Dialect::for_server_version(server_version_num);
    info!(server_version_num, tag = ?dialect.tag, "selected query dialect");
    Ok((server_version_num, dialect))
}
