use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{EngineError, FieldError, ResultEngine};

mod accounts;
mod expenses;
mod income;

pub use expenses::{ExpensePatch, ExpenseUpdate, NewExpense};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The domain layer: every store operation goes through here.
///
/// Each public method is an independent unit of work; multi-step methods run
/// inside a single DB transaction via [`with_tx!`].
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Trims a required text field, pushing a [`FieldError`] when it is empty or
/// longer than `max_chars`.
fn normalize_required_text(
    value: &str,
    field: &str,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if trimmed.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    trimmed.to_string()
}

/// Checks an amount is non-negative and within the ten-digit cap.
fn validate_amount(amount: crate::Money, field: &str, errors: &mut Vec<FieldError>) {
    if amount.is_negative() {
        errors.push(FieldError::new(field, "must not be negative"));
    } else if amount.exceeds_max() {
        errors.push(FieldError::new(field, "must be at most 99999999.99"));
    }
}

/// Maps a unique-constraint violation on insert to
/// [`EngineError::ExistingKey`]; a pre-insert duplicate check can lose a
/// race, and the loser's insert must not surface as an opaque DB error.
fn insert_conflict(err: DbErr, key: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(key.to_string()),
        _ => EngineError::Database(err),
    }
}

fn finish_validation(errors: Vec<FieldError>) -> ResultEngine<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(errors))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
