//! In-memory connector and reporter for exercising the lag checker.

use crate::connection::{ConnectionParams, Connector, Session};
use crate::dialect::Dialect;
use crate::reporter::Reporter;
use crate::shared::replag_error::{ReplagError, ReplagResult};
use crate::shared::replication_row::ReplicationRow;
use crate::shared::standby_health::{LagSize, StandbyHealth};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_postgres::types::PgLsn;

pub const MODERN_VERSION: i32 = 160002;
pub const LEGACY_VERSION: i32 = 90624;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect(String),
    Query(String, String),
    Close(String),
}

/// Canned answers of one fake server. `Err` holds the server's error text.
#[derive(Debug, Clone)]
pub struct FakeServer {
    pub version: i32,
    pub replicas: Result<Vec<ReplicationRow>, String>,
    pub current_position: Result<Option<PgLsn>, String>,
    pub health: Result<StandbyHealth, String>,
    pub lag_size: Result<String, String>,
}

impl FakeServer {
    pub fn primary(version: i32, addresses: &[&str], current_position: &str) -> Self {
        Self {
            version,
            replicas: Ok(addresses.iter().map(|a| replica(a)).collect()),
            current_position: Ok(Some(lsn(current_position))),
            health: Err("ERROR:  recovery is not in progress".to_string()),
            lag_size: Err("unexpected".to_string()),
        }
    }

    pub fn standby(version: i32, health: StandbyHealth, lag_size: &str) -> Self {
        Self {
            version,
            replicas: Ok(Vec::new()),
            current_position: Err("ERROR:  recovery is in progress".to_string()),
            health: Ok(health),
            lag_size: Ok(lag_size.to_string()),
        }
    }
}

pub fn caught_up_standby(version: i32) -> FakeServer {
    FakeServer::standby(version, caught_up("0/3000060"), "0 bytes")
}

/// Replayed 8192 bytes behind a primary at `0/3000060`.
pub fn lagging_standby(version: i32, delay_seconds: f64) -> FakeServer {
    FakeServer::standby(
        version,
        lagging("0/3000060", "0/2FFE060", delay_seconds),
        "8192 bytes",
    )
}

pub fn lsn(text: &str) -> PgLsn {
    text.parse().unwrap()
}

pub fn replica(address: &str) -> ReplicationRow {
    ReplicationRow {
        client_addr: if address.is_empty() {
            None
        } else {
            Some(address.parse().unwrap())
        },
        state: Some("streaming".to_string()),
        sent_lsn: Some(lsn("0/3000060")),
        write_lsn: Some(lsn("0/3000060")),
        flush_lsn: Some(lsn("0/3000060")),
        replay_lsn: Some(lsn("0/3000060")),
        sync_state: Some("async".to_string()),
        sync_priority: Some(0),
    }
}

pub fn caught_up(position: &str) -> StandbyHealth {
    StandbyHealth {
        recovery: true,
        replay_paused: Some(false),
        last_recv_lsn: Some(lsn(position)),
        last_replay_lsn: Some(lsn(position)),
        last_replay_ts: None,
        delay_seconds: Some(0.0),
    }
}

pub fn lagging(received: &str, replayed: &str, delay_seconds: f64) -> StandbyHealth {
    StandbyHealth {
        recovery: true,
        replay_paused: Some(false),
        last_recv_lsn: Some(lsn(received)),
        last_replay_lsn: Some(lsn(replayed)),
        last_replay_ts: Some(chrono::Local::now()),
        delay_seconds: Some(delay_seconds),
    }
}

pub fn template(host: &str) -> ConnectionParams {
    ConnectionParams {
        host: host.to_string(),
        port: 5432,
        user: "postgres".to_string(),
        dbname: "postgres".to_string(),
        password: None,
        connect_timeout: Some(Duration::from_secs(1)),
        application_name: "replag".to_string(),
    }
}

/// Hosts without a registered [`FakeServer`] refuse connections.
#[derive(Debug, Default, Clone)]
pub struct FakeConnector {
    servers: HashMap<String, FakeServer>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, host: &str, server: FakeServer) -> Self {
        self.servers.insert(host.to_string(), server);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connects(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Connect(host) => Some(host),
                _ => None,
            })
            .collect()
    }

    pub fn queries_on(&self, host: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Query(h, sql) if h == host => Some(sql),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, params: &ConnectionParams) -> ReplagResult<Box<dyn Session>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Connect(params.host.clone()));
        match self.servers.get(&params.host) {
            Some(server) => Ok(Box::new(FakeSession {
                host: params.host.clone(),
                server: server.clone(),
                calls: Arc::clone(&self.calls),
            })),
            None => Err(ReplagError::Connection {
                host: params.host.clone(),
                message: "Connection refused".to_string(),
            }),
        }
    }
}

struct FakeSession {
    host: String,
    server: FakeServer,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeSession {
    fn record(&self, sql: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Query(self.host.clone(), sql.to_string()));
    }
}

fn failed(what: &'static str, message: &str) -> ReplagError {
    ReplagError::Query {
        what,
        message: message.to_string(),
    }
}

#[async_trait]
impl Session for FakeSession {
    fn host(&self) -> &str {
        &self.host
    }

    async fn server_version_num(&self) -> ReplagResult<i32> {
        self.record("SHOW server_version_num");
        Ok(self.server.version)
    }

    async fn replication_rows(&self, sql: &str) -> ReplagResult<Vec<ReplicationRow>> {
        self.record(sql);
        self.server
            .replicas
            .clone()
            .map_err(|m| failed("stream replication listing", &m))
    }

    async fn current_position(&self, sql: &str) -> ReplagResult<PgLsn> {
        self.record(sql);
        match &self.server.current_position {
            Ok(Some(position)) => Ok(*position),
            Ok(None) => Err(ReplagError::no_rows("current position check")),
            Err(m) => Err(failed("current position check", m)),
        }
    }

    async fn standby_health(&self, sql: &str) -> ReplagResult<StandbyHealth> {
        self.record(sql);
        self.server
            .health
            .clone()
            .map_err(|m| failed("standby health check", &m))
    }

    async fn lag_size(&self, sql: &str) -> ReplagResult<LagSize> {
        self.record(sql);
        self.server
            .lag_size
            .clone()
            .map(LagSize)
            .map_err(|m| failed("replay delay size check", &m))
    }

    async fn close(self: Box<Self>) {
        self.calls.lock().unwrap().push(Call::Close(self.host.clone()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    ServerVersion(i32),
    Primary(String),
    ReplicationTable(usize),
    NoReplication,
    CurrentPosition(&'static str, PgLsn),
    Standby(String),
    StandbyHealth(&'static str, StandbyHealth),
    LagSize(&'static str, String),
    Unreachable(String),
    StandbyFailure(String),
    LagSizeFailure(String),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub reports: Vec<Report>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lag_sizes(&self) -> Vec<String> {
        self.reports
            .iter()
            .filter_map(|r| match r {
                Report::LagSize(_, size) => Some(size.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn server_version(&mut self, server_version_num: i32) {
        self.reports.push(Report::ServerVersion(server_version_num));
    }

    fn primary(&mut self, host: &str) {
        self.reports.push(Report::Primary(host.to_string()));
    }

    fn replication_table(&mut self, _dialect: &Dialect, rows: &[ReplicationRow]) {
        self.reports.push(Report::ReplicationTable(rows.len()));
    }

    fn no_replication(&mut self) {
        self.reports.push(Report::NoReplication);
    }

    fn current_position(&mut self, dialect: &Dialect, position: &PgLsn) {
        self.reports
            .push(Report::CurrentPosition(dialect.position_label, *position));
    }

    fn standby(&mut self, address: &str) {
        self.reports.push(Report::Standby(address.to_string()));
    }

    fn standby_health(&mut self, dialect: &Dialect, health: &StandbyHealth) {
        self.reports
            .push(Report::StandbyHealth(dialect.delay_column, health.clone()));
    }

    fn lag_size(&mut self, dialect: &Dialect, size: &LagSize) {
        self.reports
            .push(Report::LagSize(dialect.delay_size_column, size.0.clone()));
    }

    fn unreachable_standby(&mut self, address: &str, _error: &ReplagError) {
        self.reports.push(Report::Unreachable(address.to_string()));
    }

    fn standby_failure(&mut self, address: &str, _error: &ReplagError) {
        self.reports.push(Report::StandbyFailure(address.to_string()));
    }

    fn lag_size_failure(&mut self, address: &str, _error: &ReplagError) {
        self.reports.push(Report::LagSizeFailure(address.to_string()));
    }
}
