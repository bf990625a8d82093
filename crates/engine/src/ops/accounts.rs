//! Registration and credential verification.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, FieldError, ResultEngine, password, profiles, users};

use super::{Engine, finish_validation, insert_conflict, normalize_required_text, with_tx};

impl Engine {
    /// Register a new user, hashing the password and creating the profile
    /// row in the same transaction.
    ///
    /// Duplicate usernames fail with a validation error on `username`, so
    /// the API reports them like any other malformed field.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password_plain: &str,
    ) -> ResultEngine<()> {
        let mut errors = Vec::new();
        let username = normalize_required_text(username, "username", 150, &mut errors);
        if !username.is_empty() && username.chars().any(char::is_whitespace) {
            errors.push(FieldError::new("username", "must not contain whitespace"));
        }
        let email = normalize_required_text(email, "email", 254, &mut errors);
        if !email.is_empty() && !email.contains('@') {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if password_plain.is_empty() {
            errors.push(FieldError::new("password", "must not be empty"));
        } else if password_plain.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "must be at least 8 characters",
            ));
        }
        finish_validation(errors)?;

        let password_hash = password::hash(password_plain)?;

        with_tx!(self, |db_tx| {
            let taken = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::field("username", "already exists"));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password_hash),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| insert_conflict(err, &username))?;

            profiles::ActiveModel {
                user_id: ActiveValue::Set(username.clone()),
                monthly_income_cents: ActiveValue::Set(0),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(username = %username, "registered new user");
            Ok(())
        })
    }

    /// Verify a username/password pair, returning the username on success.
    ///
    /// Every failure path returns [`EngineError::InvalidCredentials`]; an
    /// unknown username still burns a hash verification so the caller cannot
    /// tell which half was wrong.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password_plain: &str,
    ) -> ResultEngine<String> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;

        match user {
            Some(user) if password::verify(password_plain, &user.password) => Ok(user.username),
            Some(_) => Err(EngineError::InvalidCredentials),
            None => {
                password::verify_dummy(password_plain);
                Err(EngineError::InvalidCredentials)
            }
        }
    }

    /// Look a user up by username, mapping absence to [`EngineError::KeyNotFound`].
    pub(super) async fn require_user(&self, username: &str) -> ResultEngine<users::Model> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, ActiveValue, Database};

    use super::super::insert_conflict;
    use crate::{EngineError, users};

    fn row(email: &str) -> users::ActiveModel {
        users::ActiveModel {
            username: ActiveValue::Set("alice".to_string()),
            email: ActiveValue::Set(email.to_string()),
            password: ActiveValue::Set("hash".to_string()),
        }
    }

    // A register racing another one passes the duplicate pre-check before the
    // winner commits; the loser's insert then hits the unique constraint.
    #[tokio::test]
    async fn lost_register_race_is_an_existing_key() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        row("alice@example.com").insert(&db).await.unwrap();
        let err = row("other@example.com").insert(&db).await.unwrap_err();

        assert_eq!(
            insert_conflict(err, "alice"),
            EngineError::ExistingKey("alice".to_string())
        );
    }

    #[tokio::test]
    async fn other_insert_failures_stay_database_errors() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        // no migration: the table does not exist

        let err = row("alice@example.com").insert(&db).await.unwrap_err();
        assert!(matches!(
            insert_conflict(err, "alice"),
            EngineError::Database(_)
        ));
    }
}
