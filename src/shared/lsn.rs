use crate::shared::replag_error::ReplagError;
use tokio_postgres::types::PgLsn;

/// Parses a log position read as text, `None` stays `None`.
pub fn parse_lsn(value: Option<&str>) -> Result<Option<PgLsn>, ReplagError> {
    value
        .map(|text| {
            text.trim()
                .parse::<PgLsn>()
                .map_err(|_| ReplagError::InvalidLsn(text.to_string()))
        })
        .transpose()
}
