use async_trait::async_trait;

use caixinha_core::users::{User, UserRepositoryTrait};
use caixinha_core::{Error, Result};

use super::model::UserRecord;
use crate::db::JsonStore;
use crate::errors::IntoCore;

/// Repository for users stored in `usuarios.json`.
#[derive(Clone)]
pub struct UserRepository {
    store: JsonStore,
}

impl UserRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get(&self, username: &str) -> Result<Option<User>> {
        let tables = self.store.read().into_core()?;
        Ok(tables
            .users
            .get(username)
            .map(|record| record.clone().into_domain(username)))
    }

    fn list(&self) -> Result<Vec<User>> {
        let tables = self.store.read().into_core()?;
        Ok(tables
            .users
            .iter()
            .map(|(username, record)| record.clone().into_domain(username))
            .collect())
    }

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<User>> {
        let tables = self.store.read().into_core()?;
        Ok(tables
            .users
            .iter()
            .find(|(_, record)| record.contas.iter().any(|n| n == account_number))
            .map(|(username, record)| record.clone().into_domain(username)))
    }

    async fn insert(&self, user: User) -> Result<User> {
        self.store
            .writer()
            .exec(move |tables| {
                if tables.users.contains_key(&user.username) {
                    return Err(Error::ConstraintViolation(format!(
                        "User '{}' already exists",
                        user.username
                    )));
                }
                tables
                    .users
                    .insert(user.username.clone(), UserRecord::from(&user));
                Ok(user)
            })
            .await
    }

    async fn update_password_hash(&self, username: &str, password_hash: String) -> Result<()> {
        let username = username.to_string();
        self.store
            .writer()
            .exec(move |tables| {
                let record = tables
                    .users
                    .get_mut(&username)
                    .ok_or_else(|| Error::NotFound(format!("User '{username}'")))?;
                record.senha = password_hash;
                Ok(())
            })
            .await
    }
}
