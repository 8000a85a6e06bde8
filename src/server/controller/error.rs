use actix_web::{error, HttpResponse};
use actix_web::http::StatusCode;
use derive_more::{Display, Error};
use crate::server::database::error::DataAccessError;
use crate::server::model::ErrorResponse;

#[derive(Debug, Display, Error, PartialEq)]
pub(crate) enum CustomError {
    #[display("server is busy")]
    ServerIsBusy,
    #[display("database error")]
    DbError,
    #[display("timeout occurred")]
    Timeout,
}

impl From<DataAccessError> for CustomError {
    fn from(e: DataAccessError) -> Self {
        match e {
            DataAccessError::PoolExhausted => CustomError::ServerIsBusy,
            DataAccessError::Timeout => CustomError::Timeout,
            DataAccessError::Unavailable { .. } | DataAccessError::Query { .. } => CustomError::DbError,
        }
    }
}

impl error::ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ServerIsBusy => StatusCode::SERVICE_UNAVAILABLE,
            CustomError::DbError => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
