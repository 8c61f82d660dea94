use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use beerstock_catalog::Direction;
use beerstock_core::BeerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `:key` is a beer name for `GET` and a beer id for every other method.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/:key", get(find_by_name).delete(delete_by_id))
        .route("/:key/increment", patch(increment))
        .route("/:key/decrement", patch(decrement))
}

pub async fn list_beers(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.ledger().list_all().await {
        Ok(beers) => {
            let body: Vec<serde_json::Value> = beers.iter().map(dto::beer_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.ledger().find_by_name(&name).await {
        Ok(beer) => (StatusCode::OK, Json(dto::beer_to_json(&beer))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_beer(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CreateBeerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.body_text()),
    };

    let candidate = match body.into_new_beer() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger().register(candidate).await {
        Ok(beer) => (StatusCode::CREATED, Json(dto::beer_to_json(&beer))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BeerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid beer id"),
    };

    match services.ledger().delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn increment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    adjust(&services, &id, payload, Direction::Increment).await
}

pub async fn decrement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    adjust(&services, &id, payload, Direction::Decrement).await
}

async fn adjust(
    services: &AppServices,
    id: &str,
    payload: Result<Json<dto::QuantityRequest>, JsonRejection>,
    direction: Direction,
) -> axum::response::Response {
    let id: BeerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid beer id"),
    };

    let Json(body) = match payload {
        Ok(body) => body,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.body_text()),
    };

    let delta = match body.into_delta() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.ledger().adjust_quantity(id, delta, direction).await {
        Ok(beer) => (StatusCode::OK, Json(dto::beer_to_json(&beer))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
