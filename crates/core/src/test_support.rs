//! In-memory repositories shared by the service tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::accounts::{
    Account, AccountError, AccountKind, AccountRepositoryTrait, BalanceOperation,
};
use crate::errors::{Error, Result};
use crate::goals::GoalCategory;
use crate::users::{User, UserRepositoryTrait};

#[derive(Default)]
pub struct MockAccountRepository {
    pub accounts: Mutex<BTreeMap<String, Account>>,
}

impl MockAccountRepository {
    pub fn with(accounts: Vec<Account>) -> Self {
        let map = accounts
            .into_iter()
            .map(|a| (a.account_number.clone(), a))
            .collect();
        Self {
            accounts: Mutex::new(map),
        }
    }

    pub fn balance_of(&self, number: &str) -> Option<Decimal> {
        self.accounts
            .lock()
            .unwrap()
            .get(number)
            .map(|a| a.balance())
    }
}

#[async_trait]
impl AccountRepositoryTrait for MockAccountRepository {
    fn find(&self, account_number: &str) -> Result<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(account_number).cloned())
    }

    fn list(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.lock().unwrap().values().cloned().collect())
    }

    async fn create(&self, account: Account) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.account_number) {
            return Err(Error::ConstraintViolation(account.account_number));
        }
        accounts.insert(account.account_number.clone(), account.clone());
        Ok(account)
    }

    async fn update_balance(&self, account_number: &str, balance: Decimal) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_number)
            .ok_or_else(|| Error::NotFound(account_number.to_string()))?;
        account.overwrite_balance(balance)?;
        Ok(account.clone())
    }

    async fn mutate(&self, account_number: &str, operation: BalanceOperation) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(account_number)
            .ok_or_else(|| Error::NotFound(account_number.to_string()))?;
        let mut draft = account.clone();
        operation.apply(&mut draft)?;
        *account = draft.clone();
        Ok(draft)
    }

    async fn delete(&self, account_number: &str) -> Result<Account> {
        self.accounts
            .lock()
            .unwrap()
            .remove(account_number)
            .ok_or_else(|| Error::NotFound(account_number.to_string()))
    }

    async fn delete_if_empty(&self, account_number: &str) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get(account_number)
            .ok_or_else(|| Error::NotFound(account_number.to_string()))?;
        if !account.balance().is_zero() {
            return Err(AccountError::NonZeroBalance {
                account_number: account_number.to_string(),
                balance: account.balance(),
            }
            .into());
        }
        accounts
            .remove(account_number)
            .ok_or_else(|| Error::NotFound(account_number.to_string()))
    }

    async fn create_goal_box(&self, owner: &str, category: GoalCategory) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.owner == owner && a.goal_category() == Some(category))
        {
            return Err(Error::ConstraintViolation(category.label().to_string()));
        }
        let number = category.next_free_number(|n| accounts.contains_key(n));
        let account = Account::new(number.clone(), owner, AccountKind::goal_box(category));
        accounts.insert(number, account.clone());
        Ok(account)
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    pub users: Mutex<BTreeMap<String, User>>,
    pub fail_inserts: bool,
}

impl MockUserRepository {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.username.clone(), u)).collect()),
            fail_inserts: false,
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.account_numbers.iter().any(|n| n == account_number))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User> {
        if self.fail_inserts {
            return Err(Error::Unexpected("insert refused".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(Error::ConstraintViolation(user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, username: &str, password_hash: String) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(username)
            .ok_or_else(|| Error::NotFound(username.to_string()))?;
        user.password_hash = password_hash;
        Ok(())
    }
}

pub fn user(username: &str, display_name: &str, accounts: &[&str], password_hash: &str) -> User {
    User {
        username: username.to_string(),
        display_name: display_name.to_string(),
        phone: "(81) 98479-2068".to_string(),
        email: format!("{username}@example.com"),
        national_id: "123.456.789-01".to_string(),
        birth_date: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        password_hash: password_hash.to_string(),
        account_numbers: accounts.iter().map(|a| a.to_string()).collect(),
    }
}
