use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use caixinha_core::accounts::{
    Account, AccountError, AccountKind, AccountRepositoryTrait, BalanceOperation,
};
use caixinha_core::goals::GoalCategory;
use caixinha_core::{Error, Result};

use super::model::AccountRecord;
use crate::db::{JsonStore, Tables};
use crate::errors::IntoCore;

/// Repository for accounts stored in `contas.json`.
#[derive(Clone)]
pub struct AccountRepository {
    store: JsonStore,
}

impl AccountRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

/// Loads `account_number`, lets `change` modify it and writes it back.
fn modify_account<F>(tables: &mut Tables, account_number: &str, change: F) -> Result<Account>
where
    F: FnOnce(&mut Account) -> Result<()>,
{
    let record = tables
        .accounts
        .get_mut(account_number)
        .ok_or_else(|| Error::NotFound(format!("Account {account_number}")))?;
    let mut account = record.to_domain(account_number).into_core()?;
    change(&mut account)?;
    *record = AccountRecord::from_domain(&account);
    Ok(account)
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    fn find(&self, account_number: &str) -> Result<Option<Account>> {
        let tables = self.store.read().into_core()?;
        tables
            .accounts
            .get(account_number)
            .map(|record| record.to_domain(account_number).into_core())
            .transpose()
    }

    fn list(&self) -> Result<Vec<Account>> {
        let tables = self.store.read().into_core()?;
        tables
            .accounts
            .iter()
            .map(|(number, record)| record.to_domain(number).into_core())
            .collect()
    }

    async fn create(&self, account: Account) -> Result<Account> {
        self.store
            .writer()
            .exec(move |tables| {
                if tables.accounts.contains_key(&account.account_number) {
                    return Err(Error::ConstraintViolation(format!(
                        "Account number {} already exists",
                        account.account_number
                    )));
                }
                tables.accounts.insert(
                    account.account_number.clone(),
                    AccountRecord::from_domain(&account),
                );
                debug!("Created account {}", account.account_number);
                Ok(account)
            })
            .await
    }

    async fn update_balance(&self, account_number: &str, balance: Decimal) -> Result<Account> {
        let account_number = account_number.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                modify_account(tables, &account_number, |account| {
                    account.overwrite_balance(balance).map_err(Error::from)
                })
            })
            .await
    }

    async fn mutate(&self, account_number: &str, operation: BalanceOperation) -> Result<Account> {
        let account_number = account_number.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                modify_account(tables, &account_number, |account| {
                    operation.apply(account).map_err(Error::from)
                })
            })
            .await
    }

    async fn delete(&self, account_number: &str) -> Result<Account> {
        let account_number = account_number.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                let record = tables
                    .accounts
                    .remove(&account_number)
                    .ok_or_else(|| Error::NotFound(format!("Account {account_number}")))?;
                record.to_domain(&account_number).into_core()
            })
            .await
    }

    async fn delete_if_empty(&self, account_number: &str) -> Result<Account> {
        let account_number = account_number.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                let record = tables
                    .accounts
                    .get(&account_number)
                    .ok_or_else(|| Error::NotFound(format!("Account {account_number}")))?;
                let account = record.to_domain(&account_number).into_core()?;
                if !account.balance().is_zero() {
                    return Err(AccountError::NonZeroBalance {
                        account_number,
                        balance: account.balance(),
                    }
                    .into());
                }
                tables.accounts.remove(&account_number);
                debug!("Deleted empty account {}", account_number);
                Ok(account)
            })
            .await
    }

    async fn create_goal_box(&self, owner: &str, category: GoalCategory) -> Result<Account> {
        let owner = owner.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                if tables
                    .accounts
                    .values()
                    .any(|record| record.is_goal_box_of(&owner, category))
                {
                    return Err(Error::ConstraintViolation(format!(
                        "You already have a goal box for '{}'",
                        category.label()
                    )));
                }
                let number = category.next_free_number(|n| tables.accounts.contains_key(n));
                let account = Account::new(number.clone(), owner, AccountKind::goal_box(category));
                tables
                    .accounts
                    .insert(number, AccountRecord::from_domain(&account));
                Ok(account)
            })
            .await
    }
}
