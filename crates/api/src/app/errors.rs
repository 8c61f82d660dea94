use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use beerstock_catalog::LedgerError;
use beerstock_core::DomainError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::AlreadyRegistered(_) => {
            json_error(StatusCode::BAD_REQUEST, "already_registered", message)
        }
        LedgerError::NameNotFound(_) | LedgerError::IdNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        LedgerError::StockExceeded { .. } => {
            json_error(StatusCode::BAD_REQUEST, "stock_exceeded", message)
        }
        LedgerError::StockNegative { .. } => {
            json_error(StatusCode::BAD_REQUEST, "stock_negative", message)
        }
        LedgerError::Store(e) => {
            tracing::error!("store failure: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage unavailable")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
