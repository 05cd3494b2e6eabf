use super::pricing::OrderPricingEngine;
use crate::domain::order::{
    LineItem, OrderAdjustments, OrderDetails, OrderDraft, OrderId, OrderStatus, PurchaseOrder,
    sort_by_sku,
};
use crate::domain::payment::PaymentConfig;
use crate::domain::ports::OrderStoreBox;
use crate::domain::quote::PricedOrder;
use crate::error::{PricingError, Result};
use std::collections::HashSet;
use tracing::info;

/// Caller-side workflow around the pricing engine.
///
/// Validates business rules the engine deliberately ignores, re-prices
/// orders right before they are persisted and keeps completed orders'
/// items frozen.
pub struct OrderService {
    store: OrderStoreBox,
}

impl OrderService {
    pub fn new(store: OrderStoreBox) -> Self {
        Self { store }
    }

    /// Live preview of a draft. Never fails.
    pub fn quote(&self, draft: &OrderDraft) -> PricedOrder {
        OrderPricingEngine::price_order(
            draft.items(),
            &draft.adjustments,
            &draft.payment,
            draft.order_date,
        )
    }

    /// Validates, prices and persists a new order in `Pending` status.
    pub async fn submit(&self, draft: OrderDraft) -> Result<PurchaseOrder> {
        let supplier = draft.supplier.ok_or_else(|| {
            PricingError::ValidationError("A supplier must be selected".to_string())
        })?;
        validate_items(draft.items())?;

        let id = self.store.next_id().await?;
        let mut order = PurchaseOrder {
            id,
            supplier,
            status: OrderStatus::Pending,
            order_date: draft.order_date,
            adjustments: draft.adjustments,
            payment: draft.payment.clone(),
            grouped: draft.grouped,
            items: draft.into_items(),
            pricing: PricedOrder::default(),
        };
        reprice(&mut order);

        info!(
            order = order.id,
            supplier = order.supplier,
            grand_total = %order.pricing.grand_total,
            "Order submitted"
        );
        self.store.store(order.clone()).await?;
        Ok(order)
    }

    /// Replaces items, adjustments and payment terms of a pending order.
    pub async fn update_pricing(
        &self,
        id: OrderId,
        items: Vec<LineItem>,
        adjustments: OrderAdjustments,
        payment: PaymentConfig,
    ) -> Result<PurchaseOrder> {
        let mut order = self.load(id).await?;
        order.ensure_editable()?;
        validate_items(&items)?;

        order.items = items;
        order.adjustments = adjustments;
        order.payment = payment;
        reprice(&mut order);

        info!(order = id, grand_total = %order.pricing.grand_total, "Order re-priced");
        self.store.store(order.clone()).await?;
        Ok(order)
    }

    /// Updates supplier, payment method or grouping. Pricing is left untouched.
    pub async fn update_details(&self, id: OrderId, details: OrderDetails) -> Result<PurchaseOrder> {
        let mut order = self.load(id).await?;
        order.apply_details(details);
        self.store.store(order.clone()).await?;
        Ok(order)
    }

    /// Moves the order to `Completed`. Completing twice is a no-op.
    pub async fn complete(&self, id: OrderId) -> Result<PurchaseOrder> {
        let mut order = self.load(id).await?;
        if !order.is_completed() {
            order.complete();
            self.store.store(order.clone()).await?;
            info!(order = id, "Order completed");
        }
        Ok(order)
    }

    pub async fn get(&self, id: OrderId) -> Result<Option<PurchaseOrder>> {
        self.store.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<PurchaseOrder>> {
        self.store.get_all().await
    }

    async fn load(&self, id: OrderId) -> Result<PurchaseOrder> {
        self.store
            .get(id)
            .await?
            .ok_or(PricingError::OrderNotFound(id))
    }
}

fn reprice(order: &mut PurchaseOrder) {
    sort_by_sku(&mut order.items);
    order.pricing = OrderPricingEngine::price_order(
        &order.items,
        &order.adjustments,
        &order.payment,
        order.order_date,
    );
}

fn validate_items(items: &[LineItem]) -> Result<()> {
    if items.is_empty() {
        return Err(PricingError::ValidationError(
            "At least one item is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for item in items {
        if item.quantity == 0 {
            return Err(PricingError::ValidationError(format!(
                "Quantity for SKU {} must be at least 1",
                item.sku
            )));
        }
        if !seen.insert(item.product_id.as_str()) {
            return Err(PricingError::ValidationError(format!(
                "Product {} appears more than once",
                item.product_id
            )));
        }
    }
    Ok(())
}
