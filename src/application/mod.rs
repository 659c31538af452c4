//! Application services layer.

pub mod error;
pub mod health;
pub mod posts;
pub mod repos;
pub mod seed;
pub mod users;
