//! Value Objects

pub mod credential;
pub mod date_of_birth;
pub mod display_name;
pub mod email;
pub mod password;
pub mod user_name;
