pub mod auth;
pub mod quote;
pub mod shared;
pub mod vote;
