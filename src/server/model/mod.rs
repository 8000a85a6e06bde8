pub(crate) mod config;
pub(crate) mod order;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}
