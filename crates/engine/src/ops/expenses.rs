//! Expense CRUD, always scoped to the owning user.
//!
//! Ownership checks never distinguish "exists but belongs to someone else"
//! from "does not exist": both are [`EngineError::KeyNotFound`], so an id
//! probe cannot leak another user's rows.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, EngineError, Expense, ExpenseKind, Money, ResultEngine, expenses,
};

use super::{Engine, finish_validation, normalize_required_text, validate_amount, with_tx};

/// Fields for a new expense. The owner is never part of this struct; it is
/// always the authenticated caller.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub item: String,
    pub amount: Money,
    pub category: Category,
    pub kind: ExpenseKind,
}

/// Full replacement of an expense's editable fields.
#[derive(Clone, Debug)]
pub struct ExpenseUpdate {
    pub item: String,
    pub amount: Money,
    pub category: Category,
    pub kind: ExpenseKind,
}

/// Partial update: only supplied fields change.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub item: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<Category>,
    pub kind: Option<ExpenseKind>,
}

impl Engine {
    /// List the caller's expenses, newest first.
    pub async fn expenses(&self, username: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(username))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    /// List another user's expenses, newest first.
    ///
    /// Any authenticated caller may read any user's list; only an unknown
    /// username is an error. Intentionally permissive.
    pub async fn expenses_of(&self, target_username: &str) -> ResultEngine<Vec<Expense>> {
        self.require_user(target_username).await?;
        self.expenses(target_username).await
    }

    /// Create an expense owned by `username`, assigning id and creation
    /// timestamp server-side.
    pub async fn create_expense(&self, username: &str, new: NewExpense) -> ResultEngine<Expense> {
        let mut errors = Vec::new();
        let item = normalize_required_text(&new.item, "item", 100, &mut errors);
        validate_amount(new.amount, "valor", &mut errors);
        finish_validation(errors)?;

        let expense = Expense {
            id: Uuid::new_v4(),
            item,
            amount: new.amount,
            category: new.category,
            kind: new.kind,
            created_at: Utc::now(),
        };

        expenses::ActiveModel {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(username.to_string()),
            item: ActiveValue::Set(expense.item.clone()),
            amount_cents: ActiveValue::Set(expense.amount.cents()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            kind: ActiveValue::Set(expense.kind.as_str().to_string()),
            created_at: ActiveValue::Set(expense.created_at),
        }
        .insert(&self.database)
        .await?;

        tracing::debug!(username, id = %expense.id, "created expense");
        Ok(expense)
    }

    /// Return a single expense owned by the caller.
    pub async fn expense(&self, username: &str, id: Uuid) -> ResultEngine<Expense> {
        let model = self.find_owned(&self.database, username, id).await?;
        Expense::try_from(model)
    }

    /// Replace every editable field of an owned expense. `created_at` is
    /// immutable.
    pub async fn update_expense(
        &self,
        username: &str,
        id: Uuid,
        update: ExpenseUpdate,
    ) -> ResultEngine<Expense> {
        let mut errors = Vec::new();
        let item = normalize_required_text(&update.item, "item", 100, &mut errors);
        validate_amount(update.amount, "valor", &mut errors);
        finish_validation(errors)?;

        with_tx!(self, |db_tx| {
            let model = self.find_owned(&db_tx, username, id).await?;

            let mut active: expenses::ActiveModel = model.into();
            active.item = ActiveValue::Set(item);
            active.amount_cents = ActiveValue::Set(update.amount.cents());
            active.category = ActiveValue::Set(update.category.as_str().to_string());
            active.kind = ActiveValue::Set(update.kind.as_str().to_string());
            let model = active.update(&db_tx).await?;

            Expense::try_from(model)
        })
    }

    /// Update only the supplied fields of an owned expense.
    pub async fn patch_expense(
        &self,
        username: &str,
        id: Uuid,
        patch: ExpensePatch,
    ) -> ResultEngine<Expense> {
        let mut errors = Vec::new();
        let item = patch
            .item
            .map(|item| normalize_required_text(&item, "item", 100, &mut errors));
        if let Some(amount) = patch.amount {
            validate_amount(amount, "valor", &mut errors);
        }
        finish_validation(errors)?;

        with_tx!(self, |db_tx| {
            let model = self.find_owned(&db_tx, username, id).await?;

            let mut active: expenses::ActiveModel = model.into();
            if let Some(item) = item {
                active.item = ActiveValue::Set(item);
            }
            if let Some(amount) = patch.amount {
                active.amount_cents = ActiveValue::Set(amount.cents());
            }
            if let Some(category) = patch.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            if let Some(kind) = patch.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            let model = active.update(&db_tx).await?;

            Expense::try_from(model)
        })
    }

    /// Delete an owned expense.
    pub async fn delete_expense(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let model = self.find_owned(&self.database, username, id).await?;
        let active: expenses::ActiveModel = model.into();
        active.delete(&self.database).await?;

        tracing::debug!(username, %id, "deleted expense");
        Ok(())
    }

    async fn find_owned<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
        id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(id.to_string())
            .filter(expenses::Column::UserId.eq(username))
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }
}
