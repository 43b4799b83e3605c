use log::{debug, info, warn};
use std::sync::Arc;

use super::credentials::{hash_password, verify_password, PasswordCheck};
use super::users_model::{normalize_account_number, RegistrationForm, User, UserSession};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::accounts::{Account, AccountKind, AccountRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};

/// Service for registering users and checking their credentials.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            account_repository,
        }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, form: RegistrationForm) -> Result<User> {
        let validated = form.validate()?;

        if self.repository.get(&validated.username)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "User '{}' already exists",
                validated.username
            )));
        }
        if self
            .account_repository
            .find(&validated.account_number)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "Account number {} is already in use",
                validated.account_number
            )));
        }

        let password_hash = hash_password(&validated.password)?;
        let account = Account::new(
            validated.account_number.clone(),
            validated.display_name.clone(),
            AccountKind::savings(),
        );
        self.account_repository.create(account).await?;

        let user = User {
            username: validated.username,
            display_name: validated.display_name,
            phone: validated.phone,
            email: validated.email,
            national_id: validated.national_id,
            birth_date: validated.birth_date,
            password_hash,
            account_numbers: vec![validated.account_number.clone()],
        };

        match self.repository.insert(user).await {
            Ok(user) => {
                info!(
                    "Registered user '{}' with account {}",
                    user.username, validated.account_number
                );
                Ok(user)
            }
            Err(err) => {
                // Undo the account so a retry can reuse the number.
                if let Err(cleanup) = self
                    .account_repository
                    .delete(&validated.account_number)
                    .await
                {
                    warn!(
                        "Failed to remove account {} after aborted registration: {}",
                        validated.account_number, cleanup
                    );
                }
                Err(err)
            }
        }
    }

    async fn login(&self, account_number: &str, password: &str) -> Result<UserSession> {
        if account_number.trim().is_empty() {
            return Err(ValidationError::MissingField("accountNumber".to_string()).into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password".to_string()).into());
        }
        let account_number = normalize_account_number(account_number);
        let Some(user) = self.repository.find_by_account_number(&account_number)? else {
            debug!("Login rejected: no user references account {}", account_number);
            return Err(Error::InvalidCredentials);
        };

        let check = verify_password(password, &user.password_hash).unwrap_or_else(|err| {
            warn!("Could not verify password for '{}': {}", user.username, err);
            PasswordCheck::Invalid
        });
        match check {
            PasswordCheck::Invalid => {
                debug!("Login rejected for '{}': wrong password", user.username);
                return Err(Error::InvalidCredentials);
            }
            PasswordCheck::ValidLegacy => {
                let upgraded = hash_password(password)?;
                if let Err(err) = self
                    .repository
                    .update_password_hash(&user.username, upgraded)
                    .await
                {
                    warn!(
                        "Could not upgrade plaintext password for '{}': {}",
                        user.username, err
                    );
                } else {
                    info!("Upgraded plaintext password for '{}'", user.username);
                }
            }
            PasswordCheck::Valid => {}
        }

        Ok(UserSession {
            username: user.username,
            display_name: user.display_name,
            account_number,
        })
    }

    fn get_user(&self, username: &str) -> Result<User> {
        self.repository
            .get(username)?
            .ok_or_else(|| Error::NotFound(format!("User '{username}'")))
    }

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<User>> {
        self.repository
            .find_by_account_number(&normalize_account_number(account_number))
    }
}
