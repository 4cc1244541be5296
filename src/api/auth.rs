use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Credential, SessionContext},
};

use super::{run_blocking, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
}

impl From<&Credential> for UserResponse {
    fn from(credential: &Credential) -> Self {
        Self {
            username: credential.username.clone(),
            email: credential.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Extracts the token from `Authorization: Bearer <uuid>`
fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim()
        .parse()
        .ok()
}

/// Resolves the caller's login session from the bearer token
///
/// Use `Option<SessionContext>` in handlers where logging in is optional.
#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Missing session token.".to_string()))?;

        state
            .sessions
            .get(&token)
            .await
            .ok_or_else(|| AppError::Unauthorized("Unknown or expired session.".to_string()))
    }
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(request) = payload?;
    let store = state.credentials.clone();
    let credential = run_blocking(move || {
        store.register(&request.username, &request.email, &request.password)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&credential))))
}

/// Check credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let store = state.credentials.clone();
    let credential =
        run_blocking(move || store.login(&request.username, &request.password)).await?;

    let context = state.sessions.create(&credential).await;
    tracing::info!(username = %context.username, "User logged in");

    Ok(Json(LoginResponse {
        token: context.token,
        username: context.username,
        email: context.email,
        created_at: context.created_at,
    }))
}

/// End the caller's session
pub async fn logout(State(state): State<AppState>, session: SessionContext) -> StatusCode {
    state.sessions.remove(&session.token).await;
    tracing::info!(username = %session.username, "User logged out");
    StatusCode::NO_CONTENT
}

/// Who the caller is logged in as
pub async fn me(session: SessionContext) -> Json<UserResponse> {
    Json(UserResponse {
        username: session.username,
        email: session.email,
    })
}
