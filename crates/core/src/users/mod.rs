//! Users module - registration, credentials and login.

mod credentials;
mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
mod users_service_tests;

pub use credentials::{hash_password, is_hashed, verify_password, PasswordCheck};
pub use users_model::{
    derive_username, normalize_account_number, RegistrationForm, User, UserSession,
    ValidatedRegistration,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
