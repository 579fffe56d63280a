pub mod retry;
pub mod settlement;

pub use retry::{RetryConfig, RetryState};
pub use settlement::{SettlementClient, SettlementError, SettlementRequest};
