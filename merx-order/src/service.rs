use crate::models::{Order, OrderItem, OrderStatus};
use crate::repository::OrderStore;
use merx_catalog::{PriceResolver, ResolveError};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// A requested order line as submitted by the caller. Quantity only; the
/// unit price always comes from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRequest {
    pub sku: String,
    pub qty: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(Uuid),

    #[error("order {id} is {status}; operation requires a NEW order")]
    WrongState { id: Uuid, status: OrderStatus },

    #[error("product validation failed: {0}")]
    Validation(String),

    #[error("order store failure: {0}")]
    Store(String),
}

impl From<ResolveError> for OrderError {
    fn from(e: ResolveError) -> Self {
        OrderError::Validation(e.to_string())
    }
}

/// Order lifecycle operations with authoritative pricing.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    resolver: Arc<PriceResolver>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, resolver: Arc<PriceResolver>) -> Self {
        Self { store, resolver }
    }

    pub async fn create(
        &self,
        customer_id: &str,
        lines: Vec<LineRequest>,
    ) -> Result<Order, OrderError> {
        tracing::info!(customer_id, line_count = lines.len(), "creating order");

        let items = self.price_lines(&lines).await?;
        let order = Order::new(customer_id.to_string(), items);
        self.save(&order).await?;

        tracing::info!(order_id = %order.id, total = order.total, "order created");
        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, OrderError> {
        self.store
            .get(id)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))?
            .ok_or(OrderError::NotFound(id))
    }

    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        self.store
            .list(status)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))
    }

    /// Replace the items of a NEW order, re-resolving every price.
    pub async fn update_items(
        &self,
        id: Uuid,
        lines: Vec<LineRequest>,
    ) -> Result<Order, OrderError> {
        let mut order = self.get(id).await?;
        self.require_new(&order)?;

        let items = self.price_lines(&lines).await?;
        order.replace_items(items);
        self.save(&order).await?;

        tracing::info!(order_id = %id, total = order.total, "order items updated");
        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), OrderError> {
        let order = self.get(id).await?;
        self.require_new(&order)?;

        self.store
            .delete(id)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))?;
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Terminal transition issued by the payment workflow on success.
    /// Unguarded by design; only the workflow calls this, and only once.
    pub async fn mark_paid(&self, id: Uuid) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Paid).await
    }

    /// Terminal transition issued by the payment workflow on exhaustion.
    pub async fn mark_failed(&self, id: Uuid) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::FailedPayment).await
    }

    async fn transition(&self, id: Uuid, status: OrderStatus) -> Result<Order, OrderError> {
        let mut order = self.get(id).await?;
        let previous = order.status;
        order.set_status(status);
        self.save(&order).await?;
        tracing::info!(order_id = %id, from = %previous, to = %status, "order status updated");
        Ok(order)
    }

    /// Resolve every requested line against the catalog and price it with
    /// the resolved final price. All-or-nothing.
    async fn price_lines(&self, lines: &[LineRequest]) -> Result<Vec<OrderItem>, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one line".to_string(),
            ));
        }

        let zero_qty: Vec<String> = lines
            .iter()
            .filter(|l| l.qty == 0)
            .map(|l| l.sku.clone())
            .collect();
        if !zero_qty.is_empty() {
            return Err(OrderError::Validation(format!(
                "quantity must be positive for skus: {}",
                zero_qty.join(", ")
            )));
        }

        let skus: Vec<String> = lines.iter().map(|l| l.sku.clone()).collect();
        let resolved = self.resolver.resolve_all(&skus).await?;

        Ok(lines
            .iter()
            .map(|line| {
                let record = &resolved[&line.sku];
                tracing::debug!(
                    sku = %line.sku,
                    title = %record.title,
                    qty = line.qty,
                    unit_price = record.final_price(),
                    "line priced from catalog"
                );
                OrderItem {
                    sku: line.sku.clone(),
                    qty: line.qty,
                    unit_price: record.final_price(),
                }
            })
            .collect())
    }

    fn require_new(&self, order: &Order) -> Result<(), OrderError> {
        if order.status != OrderStatus::New {
            return Err(OrderError::WrongState {
                id: order.id,
                status: order.status,
            });
        }
        Ok(())
    }

    async fn save(&self, order: &Order) -> Result<(), OrderError> {
        self.store
            .save(order)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))
    }
}
