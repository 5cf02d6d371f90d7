use crate::connection::{ConnectionParams, Connector, Session};
use crate::dialect::{Dialect, detect_dialect};
use crate::reporter::Reporter;
use crate::shared::replag_error::{ReplagError, ReplagResult};
use crate::shared::standby_health::LagSize;
use tokio_postgres::types::PgLsn;
use tracing::{debug, warn};

const LAG_SIZE: &str = "replay delay size check";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub inspected: usize,
    pub unreachable: usize,
    pub failed: usize,
}

enum StandbyOutcome {
    Inspected,
    Unreachable,
    Failed,
}

/// Visits the standbys one after another.
///
/// Each address gets exactly one connection attempt. Whatever happens on a
/// standby is reported and the walk moves on to the next address.
pub struct StandbyWalker<'a> {
    connector: &'a dyn Connector,
    reporter: &'a mut dyn Reporter,
    template: &'a ConnectionParams,
}

impl<'a> StandbyWalker<'a> {
    pub fn new(
        connector: &'a dyn Connector,
        reporter: &'a mut dyn Reporter,
        template: &'a ConnectionParams,
    ) -> Self {
        StandbyWalker {
            connector,
            reporter,
            template,
        }
    }

    pub async fn walk(&mut self, addresses: &[String], current_position: &PgLsn) -> WalkSummary {
        let mut summary = WalkSummary::default();
        for address in addresses {
            match self.visit(address, current_position).await {
                StandbyOutcome::Inspected => summary.inspected += 1,
                StandbyOutcome::Unreachable => summary.unreachable += 1,
                StandbyOutcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    async fn visit(&mut self, address: &str, current_position: &PgLsn) -> StandbyOutcome {
        if address.is_empty() {
            let error = ReplagError::Connection {
                host: String::new(),
                message: "replica has no client address".to_string(),
            };
            warn!("skipping replica connected over a local socket");
            self.reporter.unreachable_standby(address, &error);
            return StandbyOutcome::Unreachable;
        }

        let params = self.template.with_host(address);
        let session = match self.connector.connect(&params).await {
            Ok(session) => session,
            Err(e) => {
                warn!(standby = address, "cannot connect standby: {}", e);
                self.reporter.unreachable_standby(address, &e);
                return StandbyOutcome::Unreachable;
            }
        };
        self.reporter.standby(address);

        let outcome = match self.inspect(session.as_ref(), current_position).await {
            Ok(()) => StandbyOutcome::Inspected,
            Err(e) => {
                warn!(standby = address, "standby inspection aborted: {}", e);
                self.reporter.standby_failure(address, &e);
                StandbyOutcome::Failed
            }
        };
        session.close().await;
        outcome
    }

    async fn inspect(
        &mut self,
        session: &dyn Session,
        current_position: &PgLsn,
    ) -> ReplagResult<()> {
        let (_, dialect) = detect_dialect(session).await?;
        let health = session.standby_health(dialect.standby_health).await?;
        self.reporter.standby_health(dialect, &health);

        if !health.has_replay_delay() {
            debug!(standby = session.host(), "standby has replayed everything it received");
            return Ok(());
        }

        match Self::lag_size(session, dialect, current_position, health.last_replay_lsn).await {
            Ok(size) => self.reporter.lag_size(dialect, &size),
            Err(e) => {
                warn!(standby = session.host(), "{}", e);
                self.reporter.lag_size_failure(session.host(), &e);
            }
        }
        Ok(())
    }

    async fn lag_size(
        session: &dyn Session,
        dialect: &Dialect,
        current_position: &PgLsn,
        last_replay_lsn: Option<PgLsn>,
    ) -> ReplagResult<LagSize> {
        let replayed = last_replay_lsn.ok_or_else(|| ReplagError::Query {
            what: LAG_SIZE,
            message: "standby reported no replay position".to_string(),
        })?;
        session
            .lag_size(&dialect.lag_size_query(current_position, &replayed))
            .await
    }
}
