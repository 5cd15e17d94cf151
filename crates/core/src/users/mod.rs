//! Users module - domain models, password hashing, services, and traits.

mod password;
mod users_model;
mod users_service;
mod users_traits;


pub use password::{hash_password, verify_password};
pub use users_model::{
    validate_password, validate_username, Credentials, NewUser, NewUserRecord, User,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
