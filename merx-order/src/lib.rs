pub mod models;
pub mod repository;
pub mod service;
#[cfg(test)]
pub(crate) mod test_support;
pub mod workflow;

pub use models::{calculate_total, Order, OrderItem, OrderStatus};
pub use repository::{OrderStore, StoreError};
pub use service::{LineRequest, OrderError, OrderService};
pub use workflow::{PaymentConfig, PaymentWorkflow};
