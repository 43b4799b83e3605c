use async_trait::async_trait;

use super::users_model::{RegistrationForm, User, UserSession};
use crate::errors::Result;

/// Trait defining the contract for the user store.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Looks up a user by username. Returns `None` when absent.
    fn get(&self, username: &str) -> Result<Option<User>>;

    fn list(&self) -> Result<Vec<User>>;

    /// First user whose profile references the account number.
    fn find_by_account_number(&self, account_number: &str) -> Result<Option<User>>;

    /// Inserts a new user.
    ///
    /// Fails with `ConstraintViolation` when the username is taken.
    async fn insert(&self, user: User) -> Result<User>;

    async fn update_password_hash(&self, username: &str, password_hash: String) -> Result<()>;
}

/// Trait defining the contract for registration and login.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Validates the form, opens the user's savings account and stores the
    /// profile.
    async fn register(&self, form: RegistrationForm) -> Result<User>;

    /// Checks credentials; the account number may be given with or without
    /// the check-digit separator.
    async fn login(&self, account_number: &str, password: &str) -> Result<UserSession>;

    fn get_user(&self, username: &str) -> Result<User>;

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<User>>;
}
