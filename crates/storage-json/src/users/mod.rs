//! JSON storage implementation for users.

mod model;
mod repository;

pub use model::UserRecord;
pub use repository::UserRepository;
