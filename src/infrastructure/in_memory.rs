use crate::domain::order::{OrderId, PurchaseOrder};
use crate::domain::ports::OrderStore;
use crate::error::{PricingError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for purchase orders.
///
/// Uses `Arc<RwLock<BTreeMap<OrderId, PurchaseOrder>>>` so clones share the
/// same orders and listing comes back sorted by id. Nothing survives the
/// process; suited to tests and one-shot quotes.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<BTreeMap<OrderId, PurchaseOrder>>>,
    last_id: Arc<AtomicU32>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self {
            orders: Arc::new(RwLock::new(BTreeMap::new())),
            last_id: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: PurchaseOrder) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<PurchaseOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<PurchaseOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }

    async fn next_id(&self) -> Result<OrderId> {
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|last| last + 1)
            .map_err(|_| {
                PricingError::InternalError(Box::new(std::io::Error::other(
                    "Order id space exhausted",
                )))
            })
    }
}
