//! Wire types shared by the server and any client.
//!
//! Field names follow the original API vocabulary (`valor`, `categoria`,
//! `tipo`, `renda_mensal`, `criado_em`), which is the compatibility surface
//! clients already speak.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub use amount::Amount;

mod amount {
    use super::*;

    /// A two-decimal currency amount.
    ///
    /// Internally integer cents. Serializes as a fixed two-decimal string
    /// (`"1200.00"`), the format the original API emitted; deserializes from
    /// either a JSON number or a string, rejecting more than two decimal
    /// places.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Amount(i64);

    impl Amount {
        #[must_use]
        pub const fn from_cents(cents: i64) -> Self {
            Self(cents)
        }

        #[must_use]
        pub const fn cents(self) -> i64 {
            self.0
        }
    }

    impl fmt::Display for Amount {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let sign = if self.0 < 0 { "-" } else { "" };
            let abs = self.0.unsigned_abs();
            write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
        }
    }

    impl Serialize for Amount {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    fn parse_decimal(s: &str) -> Option<i64> {
        let trimmed = s.trim();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if rest.is_empty() {
            return None;
        }

        let (units_part, cents_part) = match rest.split_once(['.', ',']) {
            Some((units, cents)) => (units, cents),
            None => (rest, ""),
        };
        if cents_part.len() > 2
            || !units_part.chars().all(|c| c.is_ascii_digit())
            || !cents_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let units: i64 = if units_part.is_empty() {
            0
        } else {
            units_part.parse().ok()?
        };
        let cents: i64 = match cents_part.len() {
            0 => 0,
            1 => cents_part.parse::<i64>().ok()? * 10,
            _ => cents_part.parse().ok()?,
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .and_then(|v| v.checked_mul(sign))
    }

    struct AmountVisitor;

    impl de::Visitor<'_> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount with at most two decimal places")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            v.checked_mul(100)
                .map(Amount)
                .ok_or_else(|| E::custom("amount out of range"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            i64::try_from(v)
                .ok()
                .and_then(|v| v.checked_mul(100))
                .map(Amount)
                .ok_or_else(|| E::custom("amount out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
            if !v.is_finite() || v.abs() >= 9.0e16 {
                return Err(E::custom("amount out of range"));
            }
            let scaled = v * 100.0;
            let rounded = scaled.round();
            if (scaled - rounded).abs() > 1e-6 {
                return Err(E::custom("at most two decimal places allowed"));
            }
            Ok(Amount(rounded as i64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            parse_decimal(v)
                .map(Amount)
                .ok_or_else(|| E::custom(format!("invalid decimal amount \"{v}\"")))
        }
    }

    impl<'de> Deserialize<'de> for Amount {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(AmountVisitor)
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    /// Response of a successful login: short-lived access token plus the
    /// longer-lived refresh token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenPair {
        pub access: String,
        pub refresh: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Refresh {
        pub refresh: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccessToken {
        pub access: String,
    }
}

pub mod profile {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyIncome {
        pub renda_mensal: Amount,
    }
}

pub mod expense {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;

    /// Expense category (closed set).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Categoria {
        Investimentos,
        #[serde(rename = "Alimentação")]
        Alimentacao,
        Transporte,
        Presentes,
        #[serde(rename = "Cuidados Pessoais")]
        CuidadosPessoais,
        Lazer,
        #[serde(rename = "Custos Fixos")]
        CustosFixos,
    }

    /// Fixed or variable cost.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Tipo {
        #[serde(rename = "fixo")]
        Fixed,
        #[default]
        #[serde(rename = "variável")]
        Variable,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub item: String,
        pub valor: Amount,
        pub categoria: Categoria,
        #[serde(default)]
        pub tipo: Option<Tipo>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub item: String,
        pub valor: Amount,
        pub categoria: Categoria,
        pub tipo: Tipo,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpensePatch {
        #[serde(default)]
        pub item: Option<String>,
        #[serde(default)]
        pub valor: Option<Amount>,
        #[serde(default)]
        pub categoria: Option<Categoria>,
        #[serde(default)]
        pub tipo: Option<Tipo>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub item: String,
        pub valor: Amount,
        pub categoria: Categoria,
        pub tipo: Tipo,
        pub criado_em: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_serializes_as_two_decimal_string() {
        let json = serde_json::to_string(&Amount::from_cents(120_000)).unwrap();
        assert_eq!(json, "\"1200.00\"");
        let json = serde_json::to_string(&Amount::from_cents(5)).unwrap();
        assert_eq!(json, "\"0.05\"");
    }

    #[test]
    fn amount_deserializes_from_number_or_string() {
        let from_float: Amount = serde_json::from_str("1200.00").unwrap();
        assert_eq!(from_float.cents(), 120_000);
        let from_int: Amount = serde_json::from_str("1200").unwrap();
        assert_eq!(from_int.cents(), 120_000);
        let from_str: Amount = serde_json::from_str("\"1200.00\"").unwrap();
        assert_eq!(from_str.cents(), 120_000);
        let comma: Amount = serde_json::from_str("\"10,50\"").unwrap();
        assert_eq!(comma.cents(), 1050);
    }

    #[test]
    fn amount_rejects_more_than_two_decimals() {
        assert!(serde_json::from_str::<Amount>("12.345").is_err());
        assert!(serde_json::from_str::<Amount>("\"12.345\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn categoria_uses_wire_strings() {
        let json = serde_json::to_string(&expense::Categoria::CustosFixos).unwrap();
        assert_eq!(json, "\"Custos Fixos\"");
        let parsed: expense::Categoria = serde_json::from_str("\"Alimentação\"").unwrap();
        assert_eq!(parsed, expense::Categoria::Alimentacao);
        assert!(serde_json::from_str::<expense::Categoria>("\"Viagens\"").is_err());
    }

    #[test]
    fn tipo_defaults_to_variable() {
        assert_eq!(expense::Tipo::default(), expense::Tipo::Variable);
        let json = serde_json::to_string(&expense::Tipo::Fixed).unwrap();
        assert_eq!(json, "\"fixo\"");
    }
}
