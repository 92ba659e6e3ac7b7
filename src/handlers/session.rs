use axum::{extract::State, http::StatusCode, response::Response};
use tower_cookies::Cookies;

use crate::{
    error::Result,
    handlers::json::json_response,
    middleware_layer::auth::current_user,
    state::AppState,
};

/// Reports the signed-in user, or `null` for anonymous visitors.
#[axum::debug_handler]
pub async fn get_session(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let user = current_user(&state, &cookies).await?;
    json_response(StatusCode::OK, &user)
}
