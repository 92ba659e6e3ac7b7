use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Largest accepted request body.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Builds the CORS layer for the configured front-end origin.
///
/// `*` allows any origin, without credentials.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .max_age(Duration::from_secs(86400));

    if allowed_origin.trim() == "*" {
        tracing::warn!("⚠️ ALLOWED_ORIGIN is *, session cookies will not be sent cross-origin");
        return cors.allow_origin(AllowOrigin::any());
    }

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => cors.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            tracing::warn!("⚠️ Ignoring invalid ALLOWED_ORIGIN {:?}", allowed_origin);
            cors
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let create_product = if state.config.require_auth_for_create {
        tracing::info!("🔐 Product creation requires a signed-in user");
        post(handlers::products::create_product).route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_session,
        ))
    } else {
        post(handlers::products::create_product)
    };

    let static_files = ServeDir::new(&state.config.static_dir);
    let cors = cors_layer(&state.config.allowed_origin);

    Router::new()
        .route(
            "/api/products",
            get(handlers::products::list_products).merge(create_product),
        )
        .route("/api/products/", get(handlers::products::get_product))
        .route("/api/products/{id}", get(handlers::products::get_product))
        .route("/api/auth/session", get(handlers::session::get_session))
        .with_state(state)
        .fallback_service(static_files)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
}
