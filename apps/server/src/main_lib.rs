use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    auth::{AuthConfig, AuthManager},
    config::Config,
};
use caixinha_core::{
    accounts::{AccountRepositoryTrait, AccountService, AccountServiceTrait},
    users::{UserRepositoryTrait, UserService, UserServiceTrait},
};
use caixinha_storage_json::{self as storage, AccountRepository, JsonStore, UserRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub account_repository: Arc<dyn AccountRepositoryTrait>,
    pub user_repository: Arc<dyn UserRepositoryTrait>,
    pub store: JsonStore,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = storage::init(&config.data_dir)?;
    tracing::info!("Data directory in use: {}", store.data_dir().display());

    let account_repository = Arc::new(AccountRepository::new(store.clone()));
    let user_repository = Arc::new(UserRepository::new(store.clone()));

    let account_service = Arc::new(AccountService::new(
        account_repository.clone(),
        user_repository.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        account_repository.clone(),
    ));

    let auth_config = AuthConfig::from_secret(config.jwt_secret.as_deref(), config.session_ttl)?;
    let auth = Arc::new(AuthManager::new(&auth_config));

    Ok(Arc::new(AppState {
        account_service,
        user_service,
        account_repository,
        user_repository,
        store,
        auth,
    }))
}

/// Problems found by [`audit_integrity`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    /// `(username, account_number)` pairs that point at no stored account.
    pub dangling_references: Vec<(String, String)>,
    /// Regular accounts no user profile lists.
    pub orphaned_accounts: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty() && self.orphaned_accounts.is_empty()
    }
}

/// Cross-checks the user profiles against the account table and logs what
/// does not line up. Nothing is repaired.
pub fn audit_integrity(state: &AppState) -> anyhow::Result<IntegrityReport> {
    let accounts = state.account_repository.list()?;
    let users = state.user_repository.list()?;

    let stored: HashSet<&str> = accounts.iter().map(|a| a.account_number.as_str()).collect();
    let mut referenced = HashSet::new();
    let mut report = IntegrityReport::default();

    for user in &users {
        for number in &user.account_numbers {
            referenced.insert(number.as_str());
            if !stored.contains(number.as_str()) {
                tracing::warn!(
                    "User '{}' references missing account {}",
                    user.username,
                    number
                );
                report
                    .dangling_references
                    .push((user.username.clone(), number.clone()));
            }
        }
    }

    for account in accounts.iter().filter(|a| !a.is_goal_box()) {
        if !referenced.contains(account.account_number.as_str()) {
            tracing::warn!(
                "Account {} ({}) is not referenced by any user",
                account.account_number,
                account.owner
            );
            report.orphaned_accounts.push(account.account_number.clone());
        }
    }

    if report.is_clean() {
        tracing::info!(
            "Integrity audit passed: {} users, {} accounts",
            users.len(),
            accounts.len()
        );
    }
    Ok(report)
}
