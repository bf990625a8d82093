//! Closed sets: expense categories and the fixed/variable kind.
//!
//! Both are stored in the database as their canonical wire string, so the
//! `as_str`/`from_str` pair must stay a strict round trip.

use std::str::FromStr;

use crate::{EngineError, FieldError};

/// Expense category. The set is fixed; free-form categories are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Investimentos,
    Alimentacao,
    Transporte,
    Presentes,
    CuidadosPessoais,
    Lazer,
    CustosFixos,
}

impl Category {
    /// Canonical string stored in the database and used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Investimentos => "Investimentos",
            Self::Alimentacao => "Alimentação",
            Self::Transporte => "Transporte",
            Self::Presentes => "Presentes",
            Self::CuidadosPessoais => "Cuidados Pessoais",
            Self::Lazer => "Lazer",
            Self::CustosFixos => "Custos Fixos",
        }
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Investimentos" => Ok(Self::Investimentos),
            "Alimentação" => Ok(Self::Alimentacao),
            "Transporte" => Ok(Self::Transporte),
            "Presentes" => Ok(Self::Presentes),
            "Cuidados Pessoais" => Ok(Self::CuidadosPessoais),
            "Lazer" => Ok(Self::Lazer),
            "Custos Fixos" => Ok(Self::CustosFixos),
            other => Err(EngineError::Validation(vec![FieldError::new(
                "categoria",
                format!("\"{other}\" is not a valid category"),
            )])),
        }
    }
}

/// Whether an expense is a fixed or a variable cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpenseKind {
    Fixed,
    #[default]
    Variable,
}

impl ExpenseKind {
    /// Canonical string stored in the database and used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixo",
            Self::Variable => "variável",
        }
    }
}

impl FromStr for ExpenseKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixo" => Ok(Self::Fixed),
            "variável" => Ok(Self::Variable),
            other => Err(EngineError::Validation(vec![FieldError::new(
                "tipo",
                format!("\"{other}\" is not a valid expense kind"),
            )])),
        }
    }
}
