use crate::server::database::error::DataAccessError;
use crate::server::database::pool::{DbClient, Pool};
use crate::server::model::order::Record;
use std::time::Duration;
use tokio::time;

pub(crate) const LIST_ORDERS_STATEMENT: &str = "SELECT * FROM orders";

/// Fetch every row of `orders`, in whatever order the database returns them.
pub(crate) async fn list_orders<M: DbClient>(
    pool: &Pool<M>,
    query_timeout: Duration,
) -> Result<Vec<Record>, DataAccessError> {
    let conn = pool.acquire().await?;
    let records = time::timeout(query_timeout, conn.query_records(LIST_ORDERS_STATEMENT))
        .await
        .map_err(|_| DataAccessError::Timeout)??;
    Ok(records)
}
