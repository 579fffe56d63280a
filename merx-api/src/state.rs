use merx_order::{OrderService, PaymentWorkflow};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub payments: Arc<PaymentWorkflow>,
}
