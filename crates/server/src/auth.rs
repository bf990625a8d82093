//! Registration, login, and token refresh endpoints.

use api_types::user::{AccessToken, Login, Refresh, Register, Registered, TokenPair};
use axum::{Json, extract::State, http::StatusCode};

use crate::{AppJson, ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<Register>,
) -> Result<(StatusCode, Json<Registered>), ServerError> {
    state
        .engine
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            message: "Usuário registrado com sucesso!".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<Login>,
) -> Result<Json<TokenPair>, ServerError> {
    let username = state
        .engine
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let (access, refresh) = state
        .tokens
        .issue_pair(&username)
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(Json(TokenPair { access, refresh }))
}

pub async fn refresh(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<Refresh>,
) -> Result<Json<AccessToken>, ServerError> {
    let username = state
        .tokens
        .verify_refresh(&payload.refresh)
        .map_err(|err| ServerError::Unauthorized(err.to_string()))?;

    let access = state
        .tokens
        .issue_access(&username)
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(Json(AccessToken { access }))
}
