//! JSON storage implementation for accounts.

mod model;
mod repository;

pub use model::AccountRecord;
pub use repository::AccountRepository;
