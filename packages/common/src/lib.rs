pub mod retry;

pub use retry::{RetryPolicy, calculate_backoff};
