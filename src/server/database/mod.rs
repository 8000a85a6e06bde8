pub(crate) mod connection;
pub(crate) mod error;
pub(crate) mod orders;
pub(crate) mod pool;
pub(crate) mod row;
