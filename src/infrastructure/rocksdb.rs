use crate::domain::order::{OrderId, PurchaseOrder};
use crate::domain::ports::OrderStore;
use crate::error::{PricingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing purchase orders, keyed by big-endian order id.
pub const CF_ORDERS: &str = "orders";
/// Column Family for store bookkeeping such as the id counter.
pub const CF_META: &str = "meta";

const LAST_ORDER_ID_KEY: &[u8] = b"last_order_id";

/// A persistent order store backed by RocksDB.
///
/// Orders are stored as JSON. Big-endian keys keep the column family sorted
/// by id, which `get_all` relies on. Ids handed out by `next_id` are
/// persisted in the `meta` column family before they are returned.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>` and
/// the id reservation lock).
#[derive(Clone)]
pub struct RocksDBOrderStore {
    db: Arc<DB>,
    id_lock: Arc<Mutex<()>>,
}

impl RocksDBOrderStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            id_lock: Arc::new(Mutex::new(())),
        })
    }

    fn orders_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_ORDERS).ok_or_else(|| {
            PricingError::InternalError(Box::new(std::io::Error::other(
                "Orders column family not found",
            )))
        })
    }

    fn meta_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_META).ok_or_else(|| {
            PricingError::InternalError(Box::new(std::io::Error::other(
                "Meta column family not found",
            )))
        })
    }

    fn highest_stored_id(&self) -> Result<OrderId> {
        let cf = self.orders_cf()?;
        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _value) = item?;
                decode_id(&key)
            }
            None => Ok(0),
        }
    }
}

fn decode_id(bytes: &[u8]) -> Result<OrderId> {
    let bytes: [u8; 4] = bytes.try_into().map_err(|_| {
        PricingError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Malformed order id",
        )))
    })?;
    Ok(OrderId::from_be_bytes(bytes))
}

fn decode_order(bytes: &[u8]) -> Result<PurchaseOrder> {
    serde_json::from_slice(bytes).map_err(|e| {
        PricingError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl OrderStore for RocksDBOrderStore {
    async fn store(&self, order: PurchaseOrder) -> Result<()> {
        let cf = self.orders_cf()?;
        let value = serde_json::to_vec(&order)?;
        self.db.put_cf(cf, order.id.to_be_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<PurchaseOrder>> {
        let cf = self.orders_cf()?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode_order(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<PurchaseOrder>> {
        let cf = self.orders_cf()?;
        let mut orders = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            orders.push(decode_order(&value)?);
        }
        Ok(orders)
    }

    async fn next_id(&self) -> Result<OrderId> {
        let _guard = self.id_lock.lock().await;
        let meta = self.meta_cf()?;

        let reserved = match self.db.get_cf(meta, LAST_ORDER_ID_KEY)? {
            Some(bytes) => decode_id(&bytes)?,
            None => 0,
        };
        // Orders written before the counter existed still count.
        let id = reserved
            .max(self.highest_stored_id()?)
            .checked_add(1)
            .ok_or_else(|| {
                PricingError::InternalError(Box::new(std::io::Error::other(
                    "Order id space exhausted",
                )))
            })?;

        self.db.put_cf(meta, LAST_ORDER_ID_KEY, id.to_be_bytes())?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{LineItem, OrderAdjustments, OrderStatus};
    use crate::domain::payment::PaymentConfig;
    use crate::domain::quote::PricedOrder;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn order(id: OrderId) -> PurchaseOrder {
        PurchaseOrder {
            id,
            supplier: 1,
            status: OrderStatus::Pending,
            order_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            items: vec![LineItem::new("p1", "A", 2, dec!(3.3333))],
            adjustments: OrderAdjustments::default(),
            payment: PaymentConfig::default(),
            grouped: true,
            pricing: PricedOrder::default(),
        }
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
        assert!(store.db.cf_handle(CF_META).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_order_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();

        store.store(order(1)).await.unwrap();
        let retrieved = store.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved, order(1));

        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_next_id_follows_highest_key() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();
        assert_eq!(store.next_id().await.unwrap(), 1);

        store.store(order(2)).await.unwrap();
        store.store(order(300)).await.unwrap();
        assert_eq!(store.next_id().await.unwrap(), 301);

        let ids: Vec<OrderId> = store
            .get_all()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![2, 300]);
    }

    #[tokio::test]
    async fn test_rocksdb_next_id_reserves_before_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();
        let clone = store.clone();

        assert_eq!(store.next_id().await.unwrap(), 1);
        assert_eq!(clone.next_id().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rocksdb_next_id_distinct_under_concurrency() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.next_id().await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<OrderId>>());
    }

    #[tokio::test]
    async fn test_rocksdb_next_id_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBOrderStore::open(dir.path()).unwrap();
            assert_eq!(store.next_id().await.unwrap(), 1);
            assert_eq!(store.next_id().await.unwrap(), 2);
        }

        let store = RocksDBOrderStore::open(dir.path()).unwrap();
        assert_eq!(store.next_id().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rocksdb_next_id_exhausted() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();
        store.store(order(OrderId::MAX)).await.unwrap();

        assert!(matches!(
            store.next_id().await,
            Err(PricingError::InternalError(_))
        ));
    }
}
