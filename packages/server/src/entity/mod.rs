pub mod quote;
pub mod user;
pub mod vote;
