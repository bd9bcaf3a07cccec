pub mod auth;
pub mod health;
pub mod quote;
pub mod vote;
