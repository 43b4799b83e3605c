//! Caixinha Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules of the bank: accounts and goal
//! boxes, users and credentials, and report formatting. It is storage
//! agnostic and defines repository traits that are implemented by the
//! `storage-json` crate.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod reports;
pub mod users;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the types most callers need
pub use accounts::{Account, AccountKind, BalanceOperation};
pub use goals::GoalCategory;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
