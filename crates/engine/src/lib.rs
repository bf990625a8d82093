pub use categories::{Category, ExpenseKind};
pub use error::{EngineError, FieldError};
pub use expenses::Expense;
pub use money::Money;
pub use ops::{Engine, EngineBuilder, ExpensePatch, ExpenseUpdate, NewExpense};

mod categories;
mod error;
pub mod expenses;
mod money;
mod ops;
pub mod password;
pub mod profiles;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
