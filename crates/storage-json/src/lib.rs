//! JSON file storage implementation for the Caixinha bank.
//!
//! Two tables live in one data directory, each as a pretty-printed JSON
//! object: `contas.json` (accounts keyed by number) and `usuarios.json`
//! (users keyed by username). This crate implements the repository traits
//! defined in `caixinha-core`.
//!
//! # Architecture
//!
//! ```text
//!   request handlers            interest scheduler
//!          │                            │
//!          └─────────────┬──────────────┘
//!                        ▼
//!        AccountRepository / UserRepository
//!            │ reads               │ writes
//!            ▼                     ▼
//!    RwLock<Tables> ◄──swap── writer actor ──► temp file + rename
//! ```
//!
//! Reads take a shared lock on the in-memory tables. Every mutation is a job
//! executed by a single writer task, which persists the changed table before
//! publishing the new state.

pub mod accounts;
pub mod db;
pub mod errors;
pub mod users;

// Re-export storage utilities
pub use db::{init, JsonStore, Tables, WriteHandle, ACCOUNTS_FILE, USERS_FILE};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use accounts::AccountRepository;
pub use users::UserRepository;

// Re-export from caixinha-core for convenience
pub use caixinha_core::errors::{Error, PersistenceError, Result};
