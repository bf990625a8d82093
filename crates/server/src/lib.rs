use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use engine::EngineError;
use serde::Serialize;

pub use server::{AuthUser, ServerState, router, run_with_listener};
pub use tokens::{TokenError, TokenService};

mod auth;
mod expenses;
mod income;
mod server;
mod tokens;

pub mod types {
    pub mod user {
        pub use api_types::user::{AccessToken, Login, Refresh, Register, Registered, TokenPair};
    }

    pub mod profile {
        pub use api_types::profile::MonthlyIncome;
    }

    pub mod expense {
        pub use api_types::expense::{
            Categoria, ExpenseNew, ExpensePatch, ExpenseUpdate, ExpenseView, Tipo,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Generic(String),
    Internal(String),
}

/// `Json` wrapper whose rejection is a 400 with the usual error body,
/// instead of axum's default 422.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError::Generic(rejection.body_text())),
        }
    }
}

/// `Path` wrapper whose rejection is a 400 with the usual error body,
/// instead of axum's plain-text default.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError::Generic(rejection.body_text())),
        }
    }
}

/// 401/404-style error body.
#[derive(Serialize)]
struct Detail {
    detail: String,
}

/// 400 body: per-field validation messages, DRF-style.
#[derive(Serialize)]
struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

fn field_errors_body(fields: Vec<engine::FieldError>) -> FieldErrors {
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for field in fields {
        errors.entry(field.field).or_default().push(field.message);
    }
    FieldErrors { errors }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(EngineError::Validation(fields)) => (
                StatusCode::BAD_REQUEST,
                Json(field_errors_body(fields)),
            )
                .into_response(),
            ServerError::Engine(EngineError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                Json(Detail {
                    detail: "invalid credentials".to_string(),
                }),
            )
                .into_response(),
            ServerError::Engine(EngineError::KeyNotFound(_)) => (
                StatusCode::NOT_FOUND,
                Json(Detail {
                    detail: "not found".to_string(),
                }),
            )
                .into_response(),
            ServerError::Engine(EngineError::ExistingKey(key)) => (
                StatusCode::CONFLICT,
                Json(Detail {
                    detail: format!("\"{key}\" already present"),
                }),
            )
                .into_response(),
            ServerError::Engine(EngineError::PasswordHash(err)) => {
                tracing::error!("password hashing error: {err}");
                internal_response()
            }
            ServerError::Engine(EngineError::Database(err)) => {
                tracing::error!("database error: {err}");
                internal_response()
            }
            ServerError::Unauthorized(detail) => {
                (StatusCode::UNAUTHORIZED, Json(Detail { detail })).into_response()
            }
            ServerError::Generic(detail) => {
                (StatusCode::BAD_REQUEST, Json(Detail { detail })).into_response()
            }
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                internal_response()
            }
        }
    }
}

fn internal_response() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Detail {
            detail: "internal server error".to_string(),
        }),
    )
        .into_response()
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
