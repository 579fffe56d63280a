use async_trait::async_trait;
use merx_core::{SettlementClient, SettlementError, SettlementRequest};
use std::time::Duration;

/// HTTP settlement client: posts `{orderId, amount}` to whichever endpoint
/// the workflow selected. Any 2xx is success; the body carries no meaning.
pub struct HttpSettlementClient {
    http: reqwest::Client,
}

impl HttpSettlementClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SettlementClient for HttpSettlementClient {
    async fn settle(&self, url: &str, request: &SettlementRequest) -> Result<(), SettlementError> {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| SettlementError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "settlement endpoint responded");
        if status.is_success() {
            Ok(())
        } else {
            Err(SettlementError::Status(status.as_u16()))
        }
    }
}
