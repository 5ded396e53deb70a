//! Token authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use foodgram_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// Exchange email and password for a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.user_service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(TokenResponse { auth_token: token }))
}

/// Invalidate the current bearer token.
async fn logout(AuthUser(user): AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    state.user_service.logout(&user.id).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token/login", post(login))
        .route("/token/logout", post(logout))
}
