//! Monthly income endpoints.

use api_types::{Amount, profile::MonthlyIncome};
use axum::{Extension, Json, extract::State};
use engine::Money;

use crate::{
    AppJson, ServerError,
    server::{AuthUser, ServerState},
};

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlyIncome>, ServerError> {
    let income = state.engine.monthly_income(&user.username).await?;

    Ok(Json(MonthlyIncome {
        renda_mensal: Amount::from_cents(income.cents()),
    }))
}

pub async fn set(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppJson(payload): AppJson<MonthlyIncome>,
) -> Result<Json<MonthlyIncome>, ServerError> {
    let income = state
        .engine
        .set_monthly_income(&user.username, Money::new(payload.renda_mensal.cents()))
        .await?;

    Ok(Json(MonthlyIncome {
        renda_mensal: Amount::from_cents(income.cents()),
    }))
}
