use crate::server::database::pool::{DbClient, Pool};
use std::time::Duration;

pub(crate) struct AppState<M>
where
    M: DbClient,
{
    db_read_pool: Pool<M>,
    query_timeout: Duration,
}

impl<M> AppState<M>
where
    M: DbClient,
{
    pub fn new(db_read_pool: Pool<M>, query_timeout: Duration) -> Self {
        Self {
            db_read_pool,
            query_timeout,
        }
    }

    pub fn get_db_read_pool(&self) -> &Pool<M> {
        &self.db_read_pool
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }
}
