use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::session::SessionUser,
    state::AppState,
};

/// Extracts the session token from the request cookies.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
/// * `cookie_name` - The name of the session cookie.
///
/// # Returns
///
/// An `Option` containing the token if a non-empty one was found.
fn extract_session_token(cookies: &Cookies, cookie_name: &str) -> Option<String> {
    cookies
        .get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolves the signed-in user for a request, if any.
///
/// Expired sessions are removed from the store and treated as anonymous.
pub async fn current_user(state: &AppState, cookies: &Cookies) -> Result<Option<SessionUser>> {
    let Some(token) = extract_session_token(cookies, &state.config.session_cookie) else {
        return Ok(None);
    };

    let Some(session) = state.sessions.load(&token).await? else {
        tracing::debug!("🔑 Unknown session token");
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        tracing::debug!("⌛ Session expired for {}", session.user.email);
        if let Err(e) = state.sessions.remove(&token).await {
            tracing::warn!("❌ Failed to remove expired session: {}", e);
        }
        return Ok(None);
    }

    Ok(Some(session.user))
}

/// A middleware that requires a signed-in user.
///
/// The user is inserted into the request extensions for the handler.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let user = current_user(&state, &cookies)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!("✅ User authenticated: {}", user.email);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
