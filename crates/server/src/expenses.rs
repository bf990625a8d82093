//! Expense CRUD endpoints, plus the cross-user read-only listing.

use api_types::{
    Amount,
    expense::{Categoria, ExpenseNew, ExpensePatch, ExpenseUpdate, ExpenseView, Tipo},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    AppJson, AppPath, ServerError,
    server::{AuthUser, ServerState},
};

fn map_categoria(categoria: Categoria) -> engine::Category {
    match categoria {
        Categoria::Investimentos => engine::Category::Investimentos,
        Categoria::Alimentacao => engine::Category::Alimentacao,
        Categoria::Transporte => engine::Category::Transporte,
        Categoria::Presentes => engine::Category::Presentes,
        Categoria::CuidadosPessoais => engine::Category::CuidadosPessoais,
        Categoria::Lazer => engine::Category::Lazer,
        Categoria::CustosFixos => engine::Category::CustosFixos,
    }
}

fn map_category_back(category: engine::Category) -> Categoria {
    match category {
        engine::Category::Investimentos => Categoria::Investimentos,
        engine::Category::Alimentacao => Categoria::Alimentacao,
        engine::Category::Transporte => Categoria::Transporte,
        engine::Category::Presentes => Categoria::Presentes,
        engine::Category::CuidadosPessoais => Categoria::CuidadosPessoais,
        engine::Category::Lazer => Categoria::Lazer,
        engine::Category::CustosFixos => Categoria::CustosFixos,
    }
}

fn map_tipo(tipo: Tipo) -> engine::ExpenseKind {
    match tipo {
        Tipo::Fixed => engine::ExpenseKind::Fixed,
        Tipo::Variable => engine::ExpenseKind::Variable,
    }
}

fn map_kind_back(kind: engine::ExpenseKind) -> Tipo {
    match kind {
        engine::ExpenseKind::Fixed => Tipo::Fixed,
        engine::ExpenseKind::Variable => Tipo::Variable,
    }
}

fn view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        item: expense.item,
        valor: Amount::from_cents(expense.amount.cents()),
        categoria: map_category_back(expense.category),
        tipo: map_kind_back(expense.kind),
        criado_em: expense.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.expenses(&user.username).await?;

    Ok(Json(expenses.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let created = state
        .engine
        .create_expense(
            &user.username,
            engine::NewExpense {
                item: payload.item,
                amount: engine::Money::new(payload.valor.cents()),
                category: map_categoria(payload.categoria),
                kind: map_tipo(payload.tipo.unwrap_or_default()),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(created))))
}

pub async fn get_one(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&user.username, id).await?;

    Ok(Json(view(expense)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let updated = state
        .engine
        .update_expense(
            &user.username,
            id,
            engine::ExpenseUpdate {
                item: payload.item,
                amount: engine::Money::new(payload.valor.cents()),
                category: map_categoria(payload.categoria),
                kind: map_tipo(payload.tipo),
            },
        )
        .await?;

    Ok(Json(view(updated)))
}

pub async fn patch(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ExpensePatch>,
) -> Result<Json<ExpenseView>, ServerError> {
    let patched = state
        .engine
        .patch_expense(
            &user.username,
            id,
            engine::ExpensePatch {
                item: payload.item,
                amount: payload.valor.map(|v| engine::Money::new(v.cents())),
                category: payload.categoria.map(map_categoria),
                kind: payload.tipo.map(map_tipo),
            },
        )
        .await?;

    Ok(Json(view(patched)))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&user.username, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Read-only view of another user's expenses. Deliberately open to any
/// authenticated caller; only an unknown username is a 404.
pub async fn list_of_user(
    Extension(_user): Extension<AuthUser>,
    State(state): State<ServerState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.expenses_of(&username).await?;

    Ok(Json(expenses.into_iter().map(view).collect()))
}
