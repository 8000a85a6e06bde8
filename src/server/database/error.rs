use derive_more::{Display, Error};

/// Any failure reaching or querying the order store.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub(crate) enum DataAccessError {
    #[display("database unavailable: {reason}")]
    Unavailable { reason: String },
    #[display("no pooled connection became available in time")]
    PoolExhausted,
    #[display("query timed out")]
    Timeout,
    #[display("query failed: {reason}")]
    Query { reason: String },
}

impl From<tokio_postgres::Error> for DataAccessError {
    fn from(e: tokio_postgres::Error) -> Self {
        if e.is_closed() {
            DataAccessError::Unavailable { reason: e.to_string() }
        } else {
            DataAccessError::Query { reason: e.to_string() }
        }
    }
}
