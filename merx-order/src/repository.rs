use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use uuid::Uuid;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for order persistence. Save is upsert by id.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    async fn save(&self, order: &Order) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError>;
}
