pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
mod main_lib;

pub use main_lib::{audit_integrity, build_state, init_tracing, AppState, IntegrityReport};
