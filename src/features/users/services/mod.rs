mod user_service;

pub use user_service::{NewAccount, UserService, USERNAME_TAKEN};
