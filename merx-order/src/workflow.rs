use crate::service::{OrderError, OrderService};
use merx_core::{RetryConfig, RetryState, SettlementClient, SettlementRequest};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub success_url: String,
    pub failure_url: String,
    pub retry: RetryConfig,
}

/// The payment settlement state machine.
///
/// One `settle` call takes an order from NEW to exactly one terminal state:
/// PAID when some attempt succeeds, FAILED_PAYMENT once the bounded
/// retry budget is exhausted. The caller guarantees a single in-flight
/// settlement per order id.
pub struct PaymentWorkflow {
    client: Arc<dyn SettlementClient>,
    orders: Arc<OrderService>,
    config: PaymentConfig,
}

impl PaymentWorkflow {
    pub fn new(
        client: Arc<dyn SettlementClient>,
        orders: Arc<OrderService>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            client,
            orders,
            config,
        }
    }

    /// Attempt settlement for an order.
    ///
    /// The order id lives in call-scoped state for the whole sequence, so
    /// the terminal transition can always be correlated even if the
    /// endpoint drops every header we send it. The endpoint is chosen once
    /// from the amount and never re-evaluated during retries.
    ///
    /// Settlement failure is not an error to the caller: it surfaces as
    /// the FAILED_PAYMENT status on the order. Only an unknown order id —
    /// a caller/configuration bug — propagates as `Err`.
    pub async fn settle(&self, order_id: Uuid, amount: f64) -> Result<(), OrderError> {
        let endpoint = if amount <= 1000.0 {
            self.config.success_url.as_str()
        } else {
            self.config.failure_url.as_str()
        };
        tracing::info!(%order_id, amount, endpoint, "starting payment settlement");

        let request = SettlementRequest { order_id, amount };
        let mut retry = RetryState::new(self.config.retry.clone());

        loop {
            match self.client.settle(endpoint, &request).await {
                Ok(()) => {
                    tracing::info!(%order_id, retries = retry.attempt(), "payment approved");
                    self.orders.mark_paid(order_id).await?;
                    return Ok(());
                }
                Err(e) => match retry.next_backoff() {
                    Some(delay) => {
                        tracing::warn!(
                            %order_id,
                            attempt = retry.attempt(),
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "payment attempt failed, backing off"
                        );
                        // Sleeps in the calling task; no store or cache
                        // lock is held across the wait.
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!(
                            %order_id,
                            error = %e,
                            "payment attempts exhausted, marking order failed"
                        );
                        self.orders.mark_failed(order_id).await?;
                        return Ok(());
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use crate::service::LineRequest;
    use crate::test_support::{resolver_for, MemoryStore, MockSettlement};
    use std::time::Duration;

    const SUCCESS_URL: &str = "http://settlement/success";
    const FAILURE_URL: &str = "http://settlement/failure";

    fn retry_config() -> RetryConfig {
        RetryConfig {
            max_redeliveries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    fn workflow(
        mock: Arc<MockSettlement>,
        products: Vec<(&str, f64, f64)>,
    ) -> (PaymentWorkflow, Arc<OrderService>) {
        let orders = Arc::new(OrderService::new(
            Arc::new(MemoryStore::new()),
            resolver_for(products),
        ));
        let wf = PaymentWorkflow::new(
            mock,
            orders.clone(),
            PaymentConfig {
                success_url: SUCCESS_URL.to_string(),
                failure_url: FAILURE_URL.to_string(),
                retry: retry_config(),
            },
        );
        (wf, orders)
    }

    async fn new_order(orders: &OrderService, sku: &str, qty: u32) -> Uuid {
        orders
            .create(
                "cust-1",
                vec![LineRequest {
                    sku: sku.to_string(),
                    qty,
                }],
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn small_amount_settles_on_success_endpoint() {
        let mock = Arc::new(MockSettlement::succeeding());
        let (wf, orders) = workflow(mock.clone(), vec![("1", 500.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        wf.settle(id, 500.0).await.unwrap();

        assert_eq!(orders.get(id).await.unwrap().status, OrderStatus::Paid);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.urls.lock().unwrap().as_slice(), [SUCCESS_URL]);
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        let mock = Arc::new(MockSettlement::succeeding());
        let (wf, orders) = workflow(mock.clone(), vec![("1", 1000.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        wf.settle(id, 1000.0).await.unwrap();

        assert_eq!(mock.urls.lock().unwrap().as_slice(), [SUCCESS_URL]);
        assert_eq!(orders.get(id).await.unwrap().status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn large_amount_routes_to_failure_endpoint() {
        let mock = Arc::new(MockSettlement::succeeding());
        let (wf, orders) = workflow(mock.clone(), vec![("1", 1500.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        wf.settle(id, 1500.0).await.unwrap();

        // The chosen endpoint, not the outcome, encodes the business
        // intent: a 2xx from the failure endpoint still means paid.
        assert_eq!(mock.urls.lock().unwrap().as_slice(), [FAILURE_URL]);
        assert_eq!(orders.get(id).await.unwrap().status, OrderStatus::Paid);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_marks_failed_exactly_once() {
        let mock = Arc::new(MockSettlement::always_failing());
        let (wf, orders) = workflow(mock.clone(), vec![("1", 1500.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        wf.settle(id, 1500.0).await.unwrap();

        // First attempt plus max_redeliveries retries.
        assert_eq!(mock.call_count(), 4);
        // Every retry re-invoked the endpoint chosen up front.
        assert!(mock
            .urls
            .lock()
            .unwrap()
            .iter()
            .all(|url| url == FAILURE_URL));
        assert_eq!(
            orders.get(id).await.unwrap().status,
            OrderStatus::FailedPayment
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_success_marks_paid() {
        let mock = Arc::new(MockSettlement::failing_first(2));
        let (wf, orders) = workflow(mock.clone(), vec![("1", 800.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        wf.settle(id, 800.0).await.unwrap();

        assert_eq!(mock.call_count(), 3);
        assert_eq!(orders.get(id).await.unwrap().status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn unknown_order_is_surfaced_not_retried() {
        let mock = Arc::new(MockSettlement::succeeding());
        let (wf, _orders) = workflow(mock.clone(), vec![]);

        let err = wf.settle(Uuid::new_v4(), 100.0).await.unwrap_err();

        assert!(matches!(err, OrderError::NotFound(_)));
        // The endpoint itself was invoked once; the failure is in the
        // terminal transition, which must not be swallowed.
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_delays_grow_exponentially() {
        let mock = Arc::new(MockSettlement::always_failing());
        let (wf, orders) = workflow(mock.clone(), vec![("1", 2000.0, 0.0)]);
        let id = new_order(&orders, "1", 1).await;

        let started = tokio::time::Instant::now();
        wf.settle(id, 2000.0).await.unwrap();

        // 100ms + 200ms + 400ms of backoff under paused time.
        assert_eq!(started.elapsed(), Duration::from_millis(700));
    }
}
