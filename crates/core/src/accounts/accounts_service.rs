use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::accounts_errors::AccountError;
use super::accounts_model::{Account, AccountSummary, BalanceOperation, GoalBoxSummary};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait, InterestRun};
use crate::errors::{Error, Result};
use crate::goals::GoalCategory;
use crate::reports::ReportData;
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::now_in_report_tz;

/// Service for account operations performed on behalf of a logged-in user.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    fn load_user(&self, username: &str) -> Result<User> {
        self.user_repository
            .get(username)?
            .ok_or_else(|| Error::NotFound(format!("User '{username}'")))
    }

    fn owned_by(&self, user: &User, account_number: &str) -> Result<Account> {
        let account = self.get_account(account_number)?;
        if !user.owns(&account) {
            warn!(
                "User '{}' tried to access account {} owned by someone else",
                user.username, account_number
            );
            return Err(Error::PermissionDenied(format!(
                "Account {account_number} does not belong to you"
            )));
        }
        Ok(account)
    }

    fn goal_boxes_of(&self, user: &User) -> Result<Vec<GoalBoxSummary>> {
        let mut boxes: Vec<GoalBoxSummary> = self
            .repository
            .list()?
            .iter()
            .filter(|account| user.owns(account))
            .filter_map(GoalBoxSummary::from_account)
            .collect();
        boxes.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Ok(boxes)
    }

    fn regular_accounts_of(&self, user: &User) -> Result<Vec<AccountSummary>> {
        let mut summaries = Vec::with_capacity(user.account_numbers.len());
        for number in &user.account_numbers {
            match self.repository.find(number)? {
                Some(account) if !account.is_goal_box() => summaries.push(account.summary()),
                Some(_) => {}
                None => warn!(
                    "User '{}' references missing account {}",
                    user.username, number
                ),
            }
        }
        Ok(summaries)
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    fn get_account(&self, account_number: &str) -> Result<Account> {
        self.repository
            .find(account_number)?
            .ok_or_else(|| Error::NotFound(format!("Account {account_number}")))
    }

    fn get_owned_account(&self, username: &str, account_number: &str) -> Result<Account> {
        let user = self.load_user(username)?;
        self.owned_by(&user, account_number)
    }

    async fn deposit(
        &self,
        username: &str,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Account> {
        self.get_owned_account(username, account_number)?;
        let account = self
            .repository
            .mutate(account_number, BalanceOperation::Deposit(amount))
            .await?;
        debug!("Deposited {} into {}", amount, account_number);
        Ok(account)
    }

    async fn withdraw(
        &self,
        username: &str,
        account_number: &str,
        amount: Decimal,
    ) -> Result<Account> {
        self.get_owned_account(username, account_number)?;
        let account = self
            .repository
            .mutate(account_number, BalanceOperation::Withdraw(amount))
            .await?;
        debug!("Withdrew {} from {}", amount, account_number);
        Ok(account)
    }

    async fn accrue_interest(&self, account_number: &str) -> Result<Account> {
        self.repository
            .mutate(account_number, BalanceOperation::AccrueInterest)
            .await
    }

    async fn accrue_interest_for_all(&self) -> Result<InterestRun> {
        let mut run = InterestRun::default();
        let accounts = self.repository.list()?;
        for account in accounts.iter().filter(|a| a.kind.interest_rate().is_some()) {
            match self.accrue_interest(&account.account_number).await {
                Ok(updated) => {
                    run.credited += 1;
                    run.total_interest += updated.balance() - account.balance();
                }
                Err(err) => {
                    run.failed += 1;
                    warn!(
                        "Interest accrual failed for {}: {}",
                        account.account_number, err
                    );
                }
            }
        }
        info!(
            "Interest run finished: {} credited, {} failed, {} total",
            run.credited, run.failed, run.total_interest
        );
        Ok(run)
    }

    async fn create_goal_box(&self, username: &str, category: GoalCategory) -> Result<Account> {
        let user = self.load_user(username)?;
        let account = self
            .repository
            .create_goal_box(&user.display_name, category)
            .await?;
        info!(
            "Opened goal box {} ({}) for '{}'",
            account.account_number,
            category.label(),
            username
        );
        Ok(account)
    }

    async fn delete_goal_box(&self, username: &str, account_number: &str) -> Result<()> {
        let user = self.load_user(username)?;
        let account = self.owned_by(&user, account_number)?;
        if !account.is_goal_box() {
            return Err(AccountError::NotAGoalBox(account_number.to_string()).into());
        }
        if !account.balance().is_zero() {
            return Err(AccountError::NonZeroBalance {
                account_number: account_number.to_string(),
                balance: account.balance(),
            }
            .into());
        }
        // Re-checked by the store: a deposit may land between here and there.
        self.repository.delete_if_empty(account_number).await?;
        info!("Deleted goal box {} of '{}'", account_number, username);
        Ok(())
    }

    fn list_by_user(&self, username: &str) -> Result<Vec<AccountSummary>> {
        let user = self.load_user(username)?;
        self.regular_accounts_of(&user)
    }

    fn list_goal_boxes_by_user(&self, username: &str) -> Result<Vec<GoalBoxSummary>> {
        let user = self.load_user(username)?;
        self.goal_boxes_of(&user)
    }

    fn report_for_user(&self, username: &str) -> Result<ReportData> {
        let user = self.load_user(username)?;
        Ok(ReportData {
            holder_name: user.display_name.clone(),
            generated_at: now_in_report_tz(),
            accounts: self.regular_accounts_of(&user)?,
            goal_boxes: self.goal_boxes_of(&user)?,
        })
    }
}
