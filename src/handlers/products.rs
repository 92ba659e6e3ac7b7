use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    handlers::json::json_response,
    services::products as product_service,
    state::AppState,
    validation::product::parse_product_input,
};

/// Lists all products.
#[axum::debug_handler]
pub async fn list_products(State(state): State<AppState>) -> Result<Response> {
    let products = product_service::list_products(&state).await?;
    tracing::debug!("📦 Listed {} products", products.len());
    json_response(StatusCode::OK, &products)
}

/// Creates a product from the dashboard form.
///
/// The body is parsed by hand so that shape errors become
/// `AppError::MalformedInput` instead of an extractor rejection.
#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::MalformedInput(rejection.body_text())
        }
    })?;
    let input = parse_product_input(&body)?;
    let id = product_service::create_product(&state, input).await?;

    json_response(
        StatusCode::CREATED,
        &sonic_rs::json!({
            "message": "Product added",
            "id": id.to_string()
        }),
    )
}

/// Gets a single product.
///
/// Ids the router cannot decode are reported like any other bad id.
#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Response> {
    let Path(id) = id.map_err(|rejection| AppError::InvalidIdentifier(rejection.body_text()))?;
    let product = product_service::get_product(&state, &id).await?;
    json_response(StatusCode::OK, &product)
}
