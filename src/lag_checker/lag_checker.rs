use crate::connection::{ConnectionParams, Connector, Session};
use crate::dialect::detect_dialect;
use crate::inspector::{PrimaryInspector, StandbyWalker, WalkSummary};
use crate::reporter::Reporter;
use crate::shared::replag_error::ReplagResult;
use crate::shared::replication_row::standby_addresses;
use tokio_postgres::types::PgLsn;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub server_version_num: i32,
    pub current_position: PgLsn,
    pub standbys: Vec<String>,
    pub walk: WalkSummary,
}

/// One pass over a primary and the standbys it reports.
///
/// Only primary-side failures are returned as errors; standby problems are
/// reported and counted in the [`WalkSummary`].
pub struct LagChecker<'a> {
    connector: &'a dyn Connector,
    reporter: &'a mut dyn Reporter,
    template: &'a ConnectionParams,
}

impl<'a> LagChecker<'a> {
    pub fn new(
        connector: &'a dyn Connector,
        reporter: &'a mut dyn Reporter,
        template: &'a ConnectionParams,
    ) -> Self {
        Self {
            connector,
            reporter,
            template,
        }
    }

    pub async fn run(&mut self) -> ReplagResult<RunSummary> {
        let primary = self.connector.connect(self.template).await?;
        let result = self.check(primary.as_ref()).await;
        primary.close().await;
        result
    }

    async fn check(&mut self, primary: &dyn Session) -> ReplagResult<RunSummary> {
        let (server_version_num, dialect) = detect_dialect(primary).await?;
        self.reporter.server_version(server_version_num);
        self.reporter.primary(&self.template.host);

        let inspector = PrimaryInspector::new(primary, dialect);
        let replicas = inspector.list_replicas().await?;
        if replicas.is_empty() {
            self.reporter.no_replication();
        } else {
            self.reporter.replication_table(dialect, &replicas);
        }

        let current_position = inspector.current_position().await?;
        self.reporter.current_position(dialect, &current_position);

        let standbys = standby_addresses(&replicas);
        let walk = StandbyWalker::new(self.connector, &mut *self.reporter, self.template)
            .walk(&standbys, &current_position)
            .await;
        info!(
            inspected = walk.inspected,
            unreachable = walk.unreachable,
            failed = walk.failed,
            "standby walk finished"
        );

        Ok(RunSummary {
            server_version_num,
            current_position,
            standbys,
            walk,
        })
    }
}
