use rust_decimal::Decimal;
use thiserror::Error;

/// Business-rule violations raised by balance operations.
///
/// An operation that fails with one of these leaves the account untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Withdrawal of {amount} exceeds the per-transaction limit of {limit}")]
    LimitExceeded { amount: Decimal, limit: Decimal },

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Balance cannot be negative, got {0}")]
    NegativeBalance(Decimal),

    #[error("Account {account_number} still holds {balance}; withdraw everything first")]
    NonZeroBalance {
        account_number: String,
        balance: Decimal,
    },

    #[error("Account {0} does not accrue interest")]
    InterestNotSupported(String),

    #[error("Account {0} is not a goal box")]
    NotAGoalBox(String),

    #[error("Balance of {0} exceeds the supported range")]
    BalanceOverflow(String),
}
