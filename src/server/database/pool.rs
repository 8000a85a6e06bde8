use crate::server::database::connection::Connection;
use crate::server::database::error::DataAccessError;
use crate::server::model::order::Record;
use log::{error, info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time;

/// A client the pool can open, query through and health check.
pub(crate) trait DbClient: Send + Sync + Sized + 'static {
    /// what is needed to open a new client, e.g. a connection string
    type Config: Send + Sync + 'static;

    async fn connect(config: &Self::Config) -> Result<Self, DataAccessError>;

    /// run a parameterless statement and return every row as a record
    async fn query_records(&self, statement: &str) -> Result<Vec<Record>, DataAccessError>;

    fn is_closed(&self) -> bool;
}

pub(crate) struct CommonPool<M>
where
    M: DbClient,
{
    /// pool name
    name: String,
    config: M::Config,
    /// open clients not handed out, accessed in a FIFO manner
    idle: Mutex<VecDeque<M>>,
    /// one permit per connection that may exist at once
    slots: Arc<Semaphore>,
    size: usize,
    acquire_timeout: Duration,
}

pub(crate) struct Pool<M>(Arc<CommonPool<M>>)
where
    M: DbClient;

impl<M> Clone for Pool<M>
where
    M: DbClient,
{
    fn clone(&self) -> Pool<M> {
        Pool(self.0.clone())
    }
}

impl<M> Pool<M>
where
    M: DbClient,
{
    /// create an empty pool, connections are opened by `warm_up` or on demand
    pub fn new(
        name: impl Into<String>,
        config: M::Config,
        size: usize,
        acquire_timeout: Duration,
    ) -> Self {
        Self(Arc::new(CommonPool {
            name: name.into(),
            config,
            idle: Mutex::new(VecDeque::with_capacity(size)),
            slots: Arc::new(Semaphore::new(size)),
            size,
            acquire_timeout,
        }))
    }

    /// Open connections up to the pool size. Stops at the first failure so a
    /// database that is down does not hold up startup.
    pub async fn warm_up(&self) -> usize {
        let mut opened = 0;
        while self.idle().len() < self.0.size {
            match self.connect().await {
                Ok(client) => {
                    self.idle().push_back(client);
                    opened += 1;
                }
                Err(e) => {
                    warn!("pool={} failed to open a connection during warm up, {}", self.0.name, e);
                    break;
                }
            }
        }
        info!("pool={} warmed up with {} connection(s)", self.0.name, opened);
        opened
    }

    /// Acquire a connection, waiting at most the configured acquire timeout
    /// for one to be released.
    pub async fn acquire(&self) -> Result<Connection<M>, DataAccessError> {
        let permit = match time::timeout(self.0.acquire_timeout, self.0.slots.clone().acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(DataAccessError::Unavailable {
                    reason: format!("pool {} is closed", self.0.name),
                })
            }
            Err(_) => {
                error!(
                    "pool={} timed out to acquire a connection after {:?}",
                    self.0.name, self.0.acquire_timeout
                );
                return Err(DataAccessError::PoolExhausted);
            }
        };

        let client = match self.take_idle() {
            Some(client) => client,
            None => {
                let client = self.connect().await.inspect_err(|e| {
                    error!("pool={} failed to create connection, {}", self.0.name, e);
                })?;
                info!("pool={} connection created", self.0.name);
                client
            }
        };
        Ok(Connection::new(client, self.clone(), permit))
    }

    /// Put a client back, closed ones are dropped so the slot reconnects next time.
    pub fn release(&self, client: M) {
        if client.is_closed() {
            warn!("pool={} discarding a closed connection", self.0.name);
            return;
        }
        self.idle().push_back(client);
    }

    #[cfg(test)]
    pub fn idle_count(&self) -> usize {
        self.idle().len()
    }

    /// Open a new client, giving up after the acquire timeout so a database
    /// that accepts connections but never answers cannot hold a request.
    async fn connect(&self) -> Result<M, DataAccessError> {
        match time::timeout(self.0.acquire_timeout, M::connect(&self.0.config)).await {
            Ok(result) => result,
            Err(_) => Err(DataAccessError::Unavailable {
                reason: format!("connecting timed out after {:?}", self.0.acquire_timeout),
            }),
        }
    }

    fn take_idle(&self) -> Option<M> {
        let mut idle = self.idle();
        while let Some(client) = idle.pop_front() {
            if !client.is_closed() {
                return Some(client);
            }
            warn!("pool={} discarding a closed connection", self.0.name);
        }
        None
    }

    fn idle(&self) -> MutexGuard<'_, VecDeque<M>> {
        self.0.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
