use super::order::{OrderId, PurchaseOrder};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence boundary for submitted purchase orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts or replaces the order under its id.
    async fn store(&self, order: PurchaseOrder) -> Result<()>;
    async fn get(&self, id: OrderId) -> Result<Option<PurchaseOrder>>;
    /// All orders, ascending by id.
    async fn get_all(&self) -> Result<Vec<PurchaseOrder>>;
    /// Reserves an id for a new order.
    async fn next_id(&self) -> Result<OrderId>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
