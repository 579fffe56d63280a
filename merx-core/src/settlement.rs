use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload sent to a settlement endpoint for one payment attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
    pub amount: f64,
}

/// Settlement invocation errors. Both variants are retryable; they are kept
/// apart so logs show whether the endpoint answered at all.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("settlement endpoint returned HTTP {0}")]
    Status(u16),

    #[error("settlement transport failure: {0}")]
    Transport(String),
}

/// Seam for invoking an external settlement endpoint.
///
/// The contract is "2xx-equivalent or error": a response body carries no
/// semantics. The endpoint URL is chosen by the caller, not the client.
#[async_trait]
pub trait SettlementClient: Send + Sync {
    async fn settle(&self, url: &str, request: &SettlementRequest) -> Result<(), SettlementError>;
}
