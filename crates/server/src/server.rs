use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{ServerError, auth, expenses, income, tokens::TokenService};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenService>,
}

/// The authenticated caller, injected into request extensions by the auth
/// middleware. Handlers never see a request without it.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// Bearer-token guard for every protected route.
///
/// Token verification is pure (signature + expiry); no store access happens
/// before it succeeds.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(header)) = auth_header else {
        return Err(ServerError::Unauthorized(
            "authentication credentials were not provided".to_string(),
        ));
    };

    let username = state
        .tokens
        .verify_access(header.token())
        .map_err(|err| ServerError::Unauthorized(err.to_string()))?;

    request.extensions_mut().insert(AuthUser { username });
    Ok(next.run(request).await)
}

/// Build the full application router. Exposed so tests can drive the
/// service without binding a listener.
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/renda", get(income::get).put(income::set))
        .route("/gastos", get(expenses::list).post(expenses::create))
        .route(
            "/gastos/{id}",
            get(expenses::get_one)
                .put(expenses::update)
                .patch(expenses::patch)
                .delete(expenses::delete),
        )
        .route("/gastos/de/{username}", get(expenses::list_of_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/token/refresh", post(auth::refresh))
        .merge(protected)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenService,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    axum::serve(listener, router(state)).await
}
