use crate::connection::{ConnectionParams, Connector, Session};
use crate::shared::lsn::parse_lsn;
use crate::shared::replag_error::{ReplagError, ReplagResult};
use crate::shared::replication_row::ReplicationRow;
use crate::shared::standby_health::{LagSize, StandbyHealth};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::net::IpAddr;
use tokio::task::JoinHandle;
use tokio_postgres::types::PgLsn;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error};

const SERVER_VERSION: &str = "server version check";
const STAT_REPLICATION: &str = "stream replication listing";
const CURRENT_POSITION: &str = "current position check";
const STANDBY_HEALTH: &str = "standby health check";
const LAG_SIZE: &str = "replay delay size check";

/// Connects with `tokio-postgres` over plain TCP or a Unix socket.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, params: &ConnectionParams) -> ReplagResult<Box<dyn Session>> {
        debug!(%params, "connecting");
        let (client, connection) = params
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| ReplagError::connection(&params.host, &e))?;
        let host = params.host.clone();
        let connection_host = host.clone();
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(host = %connection_host, "connection error: {}", e);
            }
        });
        Ok(Box::new(PgSession {
            host,
            client,
            driver,
        }))
    }
}

pub struct PgSession {
    host: String,
    client: Client,
    driver: JoinHandle<()>,
}

impl PgSession {
    async fn query_one(&self, what: &'static str, sql: &str) -> ReplagResult<Row> {
        debug!(host = %self.host, sql, "executing {}", what);
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| ReplagError::query(what, &e))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ReplagError::no_rows(what))
    }
}

fn column<'a, T>(row: &'a Row, what: &'static str, idx: usize) -> ReplagResult<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(idx).map_err(|e| ReplagError::query(what, &e))
}

fn lsn_column(row: &Row, what: &'static str, idx: usize) -> ReplagResult<Option<PgLsn>> {
    let value: Option<&str> = column(row, what, idx)?;
    parse_lsn(value).map_err(|e| e.within(what))
}

#[async_trait]
impl Session for PgSession {
    fn host(&self) -> &str {
        &self.host
    }

    async fn server_version_num(&self) -> ReplagResult<i32> {
        let row = self
            .query_one(SERVER_VERSION, "SHOW server_version_num")
            .await?;
        let value: &str = column(&row, SERVER_VERSION, 0)?;
        value.trim().parse().map_err(|_| {
            ReplagError::InvalidServerVersion(value.to_string()).within(SERVER_VERSION)
        })
    }

    async fn replication_rows(&self, sql: &str) -> ReplagResult<Vec<ReplicationRow>> {
        debug!(host = %self.host, sql, "executing {}", STAT_REPLICATION);
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| ReplagError::query(STAT_REPLICATION, &e))?;
        let mut result: Vec<ReplicationRow> = Vec::with_capacity(rows.len());
        for row in rows {
            let client_addr: Option<IpAddr> = column(&row, STAT_REPLICATION, 0)?;
            let state: Option<String> = column(&row, STAT_REPLICATION, 1)?;
            let sync_state: Option<String> = column(&row, STAT_REPLICATION, 6)?;
            let sync_priority: Option<i32> = column(&row, STAT_REPLICATION, 7)?;
            result.push(ReplicationRow {
                client_addr,
                state,
                sent_lsn: lsn_column(&row, STAT_REPLICATION, 2)?,
                write_lsn: lsn_column(&row, STAT_REPLICATION, 3)?,
                flush_lsn: lsn_column(&row, STAT_REPLICATION, 4)?,
                replay_lsn: lsn_column(&row, STAT_REPLICATION, 5)?,
                sync_state,
                sync_priority,
            });
        }
        Ok(result)
    }

    async fn current_position(&self, sql: &str) -> ReplagResult<PgLsn> {
        let row = self.query_one(CURRENT_POSITION, sql).await?;
        lsn_column(&row, CURRENT_POSITION, 0)?.ok_or_else(|| ReplagError::no_rows(CURRENT_POSITION))
    }

    async fn standby_health(&self, sql: &str) -> ReplagResult<StandbyHealth> {
        let row = self.query_one(STANDBY_HEALTH, sql).await?;
        let recovery: bool = column(&row, STANDBY_HEALTH, 0)?;
        let replay_paused: Option<bool> = column(&row, STANDBY_HEALTH, 1)?;
        let last_replay_ts: Option<DateTime<Local>> = column(&row, STANDBY_HEALTH, 4)?;
        let delay_seconds: Option<f64> = column(&row, STANDBY_HEALTH, 5)?;
        Ok(StandbyHealth {
            recovery,
            replay_paused,
            last_recv_lsn: lsn_column(&row, STANDBY_HEALTH, 2)?,
            last_replay_lsn: lsn_column(&row, STANDBY_HEALTH, 3)?,
            last_replay_ts,
            delay_seconds,
        })
    }

    async fn lag_size(&self, sql: &str) -> ReplagResult<LagSize> {
        let row = self.query_one(LAG_SIZE, sql).await?;
        let size: Option<String> = column(&row, LAG_SIZE, 0)?;
        size.map(LagSize).ok_or_else(|| ReplagError::no_rows(LAG_SIZE))
    }

    async fn close(self: Box<Self>) {
        let PgSession {
            host,
            client,
            driver,
        } = *self;
        drop(client);
        if let Err(e) = driver.await {
            error!(%host, "connection task failed: {}", e);
        }
        debug!(%host, "connection closed");
    }
}
