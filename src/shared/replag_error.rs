use thiserror::Error;

pub type ReplagResult<T> = Result<T, ReplagError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplagError {
    /// Host unreachable or authentication rejected
    #[error("cannot connect to \"{host}\": {message}")]
    Connection { host: String, message: String },

    /// Query failed or returned something unusable
    #[error("{what} failed: {message}")]
    Query { what: &'static str, message: String },

    #[error("invalid log sequence number \"{0}\"")]
    InvalidLsn(String),

    #[error("invalid server version \"{0}\"")]
    InvalidServerVersion(String),
}

impl ReplagError {
    pub fn connection(host: &str, error: &tokio_postgres::Error) -> Self {
        ReplagError::Connection {
            host: host.to_string(),
            message: server_message(error),
        }
    }

    pub fn query(what: &'static str, error: &tokio_postgres::Error) -> Self {
        ReplagError::Query {
            what,
            message: server_message(error),
        }
    }

    pub fn no_rows(what: &'static str) -> Self {
        ReplagError::Query {
            what,
            message: "query returned no rows".to_string(),
        }
    }

    /// Attributes a decoding error to the query that produced the value.
    pub fn within(self, what: &'static str) -> Self {
        match self {
            ReplagError::Connection { .. } | ReplagError::Query { .. } => self,
            other => ReplagError::Query {
                what,
                message: other.to_string(),
            },
        }
    }
}

// Prefer the server's own report (severity, message, detail, hint) when there is one.
fn server_message(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => db_error.to_string(),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_errors_are_attributed_to_the_query() {
        let error = ReplagError::InvalidLsn("zz".to_string()).within("standby health check");
        assert_eq!(
            error.to_string(),
            "standby health check failed: invalid log sequence number \"zz\""
        );
    }

    #[test]
    fn query_errors_keep_their_origin() {
        let error = ReplagError::no_rows("current wal lsn").within("something else");
        assert_eq!(error.to_string(), "current wal lsn failed: query returned no rows");
    }
}
