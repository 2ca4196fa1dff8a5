pub mod auth;
pub mod grievances;
pub mod staff;
pub mod taxonomy;
pub mod users;
