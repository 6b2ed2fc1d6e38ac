use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json
};
use serde_json::json;
use log::error;
use tokio::task::JoinError;

use bankbook::LedgerError;

pub(crate) enum ServerError {
    Ledger(LedgerError),
    /// The body was not a well-formed form for the route.
    BadForm(JsonRejection),
    InternalError(anyhow::Error)
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::AccountNotFound => StatusCode::NOT_FOUND,
                LedgerError::NotConfirmed => StatusCode::CONFLICT,
                LedgerError::AccountNumberExhausted | LedgerError::Persistence(_) =>
                    StatusCode::INTERNAL_SERVER_ERROR,
                LedgerError::AgeTooLow { .. }
                | LedgerError::InvalidPin
                | LedgerError::MissingField(_)
                | LedgerError::InvalidAmount(_)
                | LedgerError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::BadForm(rejection) => rejection.status(),
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::BadForm(_) => "InvalidForm",
            Self::InternalError(_) => "InternalError",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Ledger(err) => err.to_string(),
            Self::BadForm(rejection) => rejection.body_text(),
            Self::InternalError(err) => format!("{:#}", err),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!("request failed: {}", message);
        }
        let body = json!({ "error": self.kind(), "message": message });
        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadForm(rejection)
    }
}

impl From<JoinError> for ServerError {
    fn from(err: JoinError) -> Self {
        Self::InternalError(err.into())
    }
}
