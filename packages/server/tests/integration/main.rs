mod auth;
mod common;
mod quote;
