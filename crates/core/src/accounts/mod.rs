//! Accounts module - domain models, services, and traits.

mod accounts_constants;
mod accounts_errors;
mod accounts_model;
mod accounts_service;
mod accounts_traits;


#[cfg(test)]
mod accounts_service_tests;

// Re-export the public interface
pub use accounts_constants::*;
pub use accounts_errors::AccountError;
pub use accounts_model::{
    checked_total, Account, AccountKind, AccountSummary, BalanceOperation, GoalBoxSummary,
};
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountRepositoryTrait, AccountServiceTrait, InterestRun};
