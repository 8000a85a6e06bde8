use crate::server::database::error::DataAccessError;
use crate::server::database::pool::{DbClient, Pool};
use crate::server::database::row::to_record;
use crate::server::model::order::Record;
use log::error;
use std::ops::Deref;
use tokio::sync::OwnedSemaphorePermit;
use tokio_postgres::{Client, NoTls};

/// A pooled client, handed back to its pool on drop.
pub(crate) struct Connection<M>
where
    M: DbClient,
{
    client: Option<M>,
    pool: Pool<M>,
    _permit: OwnedSemaphorePermit,
}

impl DbClient for Client {
    type Config = String;

    async fn connect(conn_str: &String) -> Result<Self, DataAccessError> {
        let (client, conn) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(|e| DataAccessError::Unavailable { reason: e.to_string() })?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!("connection returned error and aborted, {}", e);
            }
        });
        Ok(client)
    }

    async fn query_records(&self, statement: &str) -> Result<Vec<Record>, DataAccessError> {
        let rows = self.query(statement, &[]).await?;
        rows.iter()
            .map(|row| to_record(row).map_err(DataAccessError::from))
            .collect()
    }

    fn is_closed(&self) -> bool {
        Client::is_closed(self)
    }
}

impl<M> Connection<M>
where
    M: DbClient,
{
    pub fn new(client: M, pool: Pool<M>, permit: OwnedSemaphorePermit) -> Self {
        Self {
            client: Some(client),
            pool,
            _permit: permit,
        }
    }
}

impl<M> Deref for Connection<M>
where
    M: DbClient,
{
    type Target = M;

    fn deref(&self) -> &M {
        self.client
            .as_ref()
            .expect("client is only taken when the connection drops")
    }
}

impl<M> Drop for Connection<M>
where
    M: DbClient,
{
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.release(client);
        }
    }
}
