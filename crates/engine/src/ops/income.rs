//! Monthly income on the caller's profile.

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{Money, ResultEngine, profiles};

use super::{Engine, finish_validation, validate_amount, with_tx};

impl Engine {
    /// Return the caller's monthly income.
    ///
    /// Registration creates the profile row, but a missing row is healed
    /// here as an income of zero rather than treated as an error.
    pub async fn monthly_income(&self, username: &str) -> ResultEngine<Money> {
        let profile = profiles::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;

        Ok(profile
            .map(|p| Money::new(p.monthly_income_cents))
            .unwrap_or(Money::ZERO))
    }

    /// Replace the caller's monthly income.
    pub async fn set_monthly_income(&self, username: &str, amount: Money) -> ResultEngine<Money> {
        let mut errors = Vec::new();
        validate_amount(amount, "renda_mensal", &mut errors);
        finish_validation(errors)?;

        with_tx!(self, |db_tx| {
            let profile = profiles::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?;

            match profile {
                Some(profile) => {
                    let mut profile: profiles::ActiveModel = profile.into();
                    profile.monthly_income_cents = ActiveValue::Set(amount.cents());
                    profile.update(&db_tx).await?;
                }
                None => {
                    profiles::ActiveModel {
                        user_id: ActiveValue::Set(username.to_string()),
                        monthly_income_cents: ActiveValue::Set(amount.cents()),
                    }
                    .insert(&db_tx)
                    .await?;
                }
            }

            Ok(amount)
        })
    }
}
