//! Expenses table and the typed `Expense` snapshot the engine hands out.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Category, EngineError, ExpenseKind, Money};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub item: String,
    pub amount_cents: i64,
    pub category: String,
    pub kind: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An expense as the rest of the system sees it: typed category and kind,
/// amount in cents, server-assigned id and creation timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub item: String,
    pub amount: Money,
    pub category: Category,
    pub kind: ExpenseKind,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?;
        Ok(Self {
            id,
            item: model.item,
            amount: Money::new(model.amount_cents),
            category: model.category.parse()?,
            kind: model.kind.parse()?,
            created_at: model.created_at,
        })
    }
}
