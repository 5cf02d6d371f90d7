use crate::dialect::Dialect;
use crate::reporter::Reporter;
use crate::shared::replag_error::ReplagError;
use crate::shared::replication_row::ReplicationRow;
use crate::shared::standby_health::{LagSize, StandbyHealth};
use colored::Colorize;
use prettytable::format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR;
use prettytable::{Cell, Row, Table};
use std::fmt::Display;
use tokio_postgres::types::PgLsn;

/// Prints tables to stdout and warnings to stderr.
#[derive(Debug, Default)]
pub struct TableReporter;

impl TableReporter {
    pub fn new() -> Self {
        Self
    }

    fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
        let mut table = Table::new();
        table.set_format(*FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(Row::new(header.iter().map(|h| Cell::new(h)).collect()));
        for row in rows {
            table.add_row(Row::new(row.iter().map(|v| Cell::new(v)).collect()));
        }
        table.printstd();
        println!();
    }
}

fn or_empty<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    let text = if value { "t" } else { "f" };
    text.to_string()
}

pub(crate) fn replication_cells(row: &ReplicationRow) -> Vec<String> {
    vec![
        or_empty(&row.client_addr),
        or_empty(&row.state),
        or_empty(&row.sent_lsn),
        or_empty(&row.write_lsn),
        or_empty(&row.flush_lsn),
        or_empty(&row.replay_lsn),
        or_empty(&row.sync_state),
        or_empty(&row.sync_priority),
    ]
}

pub(crate) fn health_cells(health: &StandbyHealth) -> Vec<String> {
    vec![
        flag(health.recovery),
        health.replay_paused.map(flag).unwrap_or_default(),
        or_empty(&health.last_recv_lsn),
        or_empty(&health.last_replay_lsn),
        health
            .last_replay_ts
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string())
            .unwrap_or_default(),
        or_empty(&health.delay_seconds),
    ]
}

impl Reporter for TableReporter {
    fn server_version(&mut self, server_version_num: i32) {
        println!("server version: {}", server_version_num);
    }

    fn primary(&mut self, host: &str) {
        println!("\n{}", format!("[PRIMARY]: {}", host).green().bold());
    }

    fn replication_table(&mut self, dialect: &Dialect, rows: &[ReplicationRow]) {
        Self::print_table(
            &dialect.replication_columns,
            rows.iter().map(replication_cells).collect(),
        );
    }

    fn no_replication(&mut self) {
        println!("{}", "INFO: there is no stream replication".yellow());
    }

    fn current_position(&mut self, dialect: &Dialect, position: &PgLsn) {
        println!("current {}: {}\n", dialect.position_label, position);
    }

    fn standby(&mut self, address: &str) {
        println!("{}", format!("[STANDBY]: {}", address).green().bold());
    }

    fn standby_health(&mut self, dialect: &Dialect, health: &StandbyHealth) {
        Self::print_table(
            &[
                "recovery",
                "replay_paused",
                "last_recv_lsn",
                "last_replay_lsn",
                "last_replay_ts",
                dialect.delay_column,
            ],
            vec![health_cells(health)],
        );
    }

    fn lag_size(&mut self, dialect: &Dialect, size: &LagSize) {
        println!("{}: {}\n", dialect.delay_size_column, size.0);
    }

    fn unreachable_standby(&mut self, address: &str, error: &ReplagError) {
        let warning = if address.is_empty() {
            "WARNING: standby has no client address (local socket connection)".to_string()
        } else {
            format!("WARNING: cannot connect standby \"{}\": {}", address, error)
        };
        eprintln!("{}", warning.yellow());
    }

    fn standby_failure(&mut self, address: &str, error: &ReplagError) {
        eprintln!(
            "{}",
            format!("ERROR: standby \"{}\": {}", address, error).red()
        );
    }

    fn lag_size_failure(&mut self, address: &str, error: &ReplagError) {
        eprintln!(
            "{}",
            format!("WARNING: standby \"{}\": {}", address, error).yellow()
        );
    }
}
