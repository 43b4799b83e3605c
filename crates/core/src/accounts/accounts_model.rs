//! Account domain models.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::accounts_constants::account_types;
use super::accounts_errors::AccountError;
use crate::constants::{
    CHECKING_MAINTENANCE_FEE, DEFAULT_INTEREST_RATE, MONEY_SCALE, WITHDRAWAL_LIMIT,
};
use crate::goals::GoalCategory;

/// What kind of account this is, with the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AccountKind {
    Checking,
    Savings {
        #[serde(rename = "interestRate")]
        interest_rate: Decimal,
    },
    /// A savings account earmarked for one goal category.
    GoalBox {
        category: GoalCategory,
        #[serde(rename = "interestRate")]
        interest_rate: Decimal,
    },
}

impl AccountKind {
    pub fn savings() -> Self {
        AccountKind::Savings {
            interest_rate: DEFAULT_INTEREST_RATE,
        }
    }

    pub fn goal_box(category: GoalCategory) -> Self {
        AccountKind::GoalBox {
            category,
            interest_rate: DEFAULT_INTEREST_RATE,
        }
    }

    /// Interest rate in percent per period; `None` for kinds that do not accrue.
    pub fn interest_rate(&self) -> Option<Decimal> {
        match self {
            AccountKind::Checking => None,
            AccountKind::Savings { interest_rate } | AccountKind::GoalBox { interest_rate, .. } => {
                Some(*interest_rate)
            }
        }
    }

    /// Persisted type tag (`tipo`).
    pub fn type_tag(&self) -> &'static str {
        match self {
            AccountKind::Checking => account_types::CHECKING,
            AccountKind::Savings { .. } | AccountKind::GoalBox { .. } => account_types::SAVINGS,
        }
    }
}

/// Domain model representing a bank account.
///
/// The balance is private: it only changes through [`Account::deposit`],
/// [`Account::withdraw`], [`Account::accrue_interest`] and the store-level
/// [`Account::overwrite_balance`], all of which keep it non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: String,
    pub owner: String,
    balance: Decimal,
    pub kind: AccountKind,
}

impl Account {
    /// Opens an empty account.
    pub fn new(account_number: impl Into<String>, owner: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            account_number: account_number.into(),
            owner: owner.into(),
            balance: Decimal::ZERO,
            kind,
        }
    }

    /// Rebuilds an account from persisted state.
    pub fn restore(
        account_number: impl Into<String>,
        owner: impl Into<String>,
        balance: Decimal,
        kind: AccountKind,
    ) -> Result<Self, AccountError> {
        if balance < Decimal::ZERO {
            return Err(AccountError::NegativeBalance(balance));
        }
        Ok(Self {
            account_number: account_number.into(),
            owner: owner.into(),
            balance,
            kind,
        })
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn withdrawal_limit() -> Decimal {
        WITHDRAWAL_LIMIT
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| AccountError::BalanceOverflow(self.account_number.clone()))?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        if amount > WITHDRAWAL_LIMIT {
            return Err(AccountError::LimitExceeded {
                amount,
                limit: WITHDRAWAL_LIMIT,
            });
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Applies one period of interest and returns the amount credited.
    ///
    /// Not idempotent: every call compounds.
    pub fn accrue_interest(&mut self) -> Result<Decimal, AccountError> {
        let rate = self
            .kind
            .interest_rate()
            .ok_or_else(|| AccountError::InterestNotSupported(self.account_number.clone()))?;
        let overflow = || AccountError::BalanceOverflow(self.account_number.clone());
        let interest = self
            .balance
            .checked_mul(rate)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)?
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        self.balance = self.balance.checked_add(interest).ok_or_else(overflow)?;
        Ok(interest)
    }

    /// Fee charged for keeping this account ("tarifa").
    pub fn calculate_fee(&self) -> Decimal {
        match self.kind {
            AccountKind::Checking => CHECKING_MAINTENANCE_FEE,
            AccountKind::Savings { .. } | AccountKind::GoalBox { .. } => Decimal::ZERO,
        }
    }

    /// Direct balance assignment, reserved for the account store.
    pub fn overwrite_balance(&mut self, balance: Decimal) -> Result<(), AccountError> {
        if balance < Decimal::ZERO {
            return Err(AccountError::NegativeBalance(balance));
        }
        self.balance = balance;
        Ok(())
    }

    pub fn is_goal_box(&self) -> bool {
        matches!(self.kind, AccountKind::GoalBox { .. })
    }

    pub fn goal_category(&self) -> Option<GoalCategory> {
        match self.kind {
            AccountKind::GoalBox { category, .. } => Some(category),
            _ => None,
        }
    }

    pub fn goal_label(&self) -> Option<&'static str> {
        self.goal_category().map(|c| c.label())
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary::from(self)
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount <= Decimal::ZERO {
        return Err(AccountError::InvalidAmount(amount));
    }
    Ok(())
}

/// Adds up balances, failing instead of overflowing. `owner` names whose
/// total it is in the error.
pub fn checked_total<I>(owner: &str, balances: I) -> Result<Decimal, AccountError>
where
    I: IntoIterator<Item = Decimal>,
{
    balances
        .into_iter()
        .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance))
        .ok_or_else(|| AccountError::BalanceOverflow(owner.to_string()))
}

/// Balance-changing operation executed atomically by the account store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOperation {
    Deposit(Decimal),
    Withdraw(Decimal),
    AccrueInterest,
}

impl BalanceOperation {
    pub fn apply(&self, account: &mut Account) -> Result<(), AccountError> {
        match *self {
            BalanceOperation::Deposit(amount) => account.deposit(amount),
            BalanceOperation::Withdraw(amount) => account.withdraw(amount),
            BalanceOperation::AccrueInterest => account.accrue_interest().map(|_| ()),
        }
    }
}

/// Read-only projection of a regular (non goal-box) account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_number: String,
    pub owner: String,
    pub balance: Decimal,
    pub account_type: String,
    /// Zero for kinds that do not accrue interest.
    pub interest_rate: Decimal,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number.clone(),
            owner: account.owner.clone(),
            balance: account.balance(),
            account_type: account.kind.type_tag().to_string(),
            interest_rate: account.kind.interest_rate().unwrap_or(Decimal::ZERO),
        }
    }
}

/// Read-only projection of a goal box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalBoxSummary {
    pub account_number: String,
    pub owner: String,
    pub balance: Decimal,
    pub category: GoalCategory,
}

impl GoalBoxSummary {
    /// `None` when the account is not a goal box.
    pub fn from_account(account: &Account) -> Option<Self> {
        account.goal_category().map(|category| Self {
            account_number: account.account_number.clone(),
            owner: account.owner.clone(),
            balance: account.balance(),
            category,
        })
    }
}
