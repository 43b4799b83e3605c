//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! storage-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, AccountSummary, BalanceOperation, GoalBoxSummary};
use crate::errors::Result;
use crate::goals::GoalCategory;
use crate::reports::ReportData;

/// Trait defining the contract for the account store.
///
/// Every mutating call is persisted before it returns; a failed call leaves
/// the stored state unchanged.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Looks up an account by number. Returns `None` when absent.
    fn find(&self, account_number: &str) -> Result<Option<Account>>;

    /// Lists every account in the store.
    fn list(&self) -> Result<Vec<Account>>;

    /// Inserts a new account.
    ///
    /// Fails with `ConstraintViolation` when the number is already taken.
    async fn create(&self, account: Account) -> Result<Account>;

    /// Overwrites the balance of an account.
    async fn update_balance(&self, account_number: &str, balance: Decimal) -> Result<Account>;

    /// Runs a balance operation as one read-modify-write step.
    async fn mutate(&self, account_number: &str, operation: BalanceOperation) -> Result<Account>;

    /// Removes an account and returns its last state.
    ///
    /// The store does not check the balance or the owner; callers do.
    async fn delete(&self, account_number: &str) -> Result<Account>;

    /// Removes an account only if its balance is zero at the moment of
    /// removal; fails with `NonZeroBalance` otherwise.
    async fn delete_if_empty(&self, account_number: &str) -> Result<Account>;

    /// Opens a goal box for `owner`, generating the next free number of the
    /// category.
    ///
    /// Fails with `ConstraintViolation` when the owner already has a box of
    /// that category.
    async fn create_goal_box(&self, owner: &str, category: GoalCategory) -> Result<Account>;
}

/// Counters reported by a bulk interest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestRun {
    pub credited: usize,
    pub failed: usize,
    pub total_interest: Decimal,
}

/// Trait defining the contract for account service operations.
///
/// Operations taking a `username` act on behalf of that user and fail with
/// `PermissionDenied` when the account belongs to somebody else.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Retrieves an account by number.
    fn get_account(&self, account_number: &str) -> Result<Account>;

    /// Retrieves an account owned by `username`.
    fn get_owned_account(&self, username: &str, account_number: &str) -> Result<Account>;

    async fn deposit(&self, username: &str, account_number: &str, amount: Decimal)
        -> Result<Account>;

    async fn withdraw(
        &self,
        username: &str,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Account>;

    /// Credits one period of interest to a savings account.
    async fn accrue_interest(&self, account_number: &str) -> Result<Account>;

    /// Credits one period of interest to every account that accrues it.
    async fn accrue_interest_for_all(&self) -> Result<InterestRun>;

    async fn create_goal_box(&self, username: &str, category: GoalCategory) -> Result<Account>;

    /// Deletes a goal box owned by `username`; its balance must be zero.
    async fn delete_goal_box(&self, username: &str, account_number: &str) -> Result<()>;

    /// Regular accounts referenced by the user's profile.
    fn list_by_user(&self, username: &str) -> Result<Vec<AccountSummary>>;

    /// Goal boxes owned by the user.
    fn list_goal_boxes_by_user(&self, username: &str) -> Result<Vec<GoalBoxSummary>>;

    /// Collects everything an exported report shows for the user.
    fn report_for_user(&self, username: &str) -> Result<ReportData>;
}
