use super::payment::{PaymentConfig, PaymentMethod};
use super::quote::PricedOrder;
use crate::error::{PricingError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type OrderId = u32;
pub type SupplierId = u32;

/// A product line on a purchase order, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub sku: String,
    pub quantity: u32,
    /// Supplier cost price for one unit.
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        sku: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            sku: sku.into(),
            quantity,
            unit_price,
        }
    }

    /// `quantity * unit_price`, before any allocated cost. Saturates at the
    /// `Decimal` bounds instead of overflowing.
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}

/// Sorts items by SKU, ascending. Stable, so equal SKUs keep their relative order.
pub fn sort_by_sku(items: &mut [LineItem]) {
    items.sort_by(|a, b| a.sku.cmp(&b.sku));
}

/// Supplier-level adjustments applied to the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAdjustments {
    pub discount: Decimal,
    pub shipping_cost: Decimal,
    pub other_costs: Decimal,
}

impl OrderAdjustments {
    pub fn new(discount: Decimal, shipping_cost: Decimal, other_costs: Decimal) -> Self {
        Self {
            discount,
            shipping_cost,
            other_costs,
        }
    }

    /// Shipping plus other costs, saturating at `Decimal::MAX`.
    pub fn additional_costs(&self) -> Decimal {
        self.shipping_cost.saturating_add(self.other_costs)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

/// An order being composed.
///
/// Items are kept sorted by SKU after every mutation. Edits through
/// `upsert_item` keep a product on at most one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub supplier: Option<SupplierId>,
    items: Vec<LineItem>,
    pub adjustments: OrderAdjustments,
    pub payment: PaymentConfig,
    pub order_date: NaiveDate,
    pub grouped: bool,
}

impl OrderDraft {
    pub fn new(order_date: NaiveDate) -> Self {
        Self {
            supplier: None,
            items: Vec::new(),
            adjustments: OrderAdjustments::default(),
            payment: PaymentConfig::default(),
            order_date,
            grouped: false,
        }
    }

    /// Builds a draft from a batch of items, sorted by SKU.
    ///
    /// Lines are kept as given, so a batch that repeats a product still carries
    /// every row and is rejected at submission.
    pub fn with_items(order_date: NaiveDate, items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut draft = Self::new(order_date);
        draft.items = items.into_iter().collect();
        sort_by_sku(&mut draft.items);
        draft
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Adds a line, or replaces the line already holding the same product.
    pub fn upsert_item(&mut self, item: LineItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        sort_by_sku(&mut self.items);
    }

    pub fn remove_item(&mut self, product_id: &str) -> Option<LineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Returns `false` when the product is not on the order.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        match self.item_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when the product is not on the order.
    pub fn set_unit_price(&mut self, product_id: &str, unit_price: Decimal) -> bool {
        match self.item_mut(product_id) {
            Some(item) => {
                item.unit_price = unit_price;
                true
            }
            None => false,
        }
    }

    fn item_mut(&mut self, product_id: &str) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }
}

/// Metadata that stays editable after an order is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderDetails {
    pub supplier: Option<SupplierId>,
    pub method: Option<PaymentMethod>,
    pub grouped: Option<bool>,
}

/// A submitted purchase order together with its last pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub supplier: SupplierId,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub adjustments: OrderAdjustments,
    pub payment: PaymentConfig,
    pub grouped: bool,
    pub pricing: PricedOrder,
}

impl PurchaseOrder {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Fails once the order is completed; items and adjustments are frozen from then on.
    pub fn ensure_editable(&self) -> Result<()> {
        if self.is_completed() {
            Err(PricingError::OrderCompleted(self.id))
        } else {
            Ok(())
        }
    }

    pub fn complete(&mut self) {
        self.status = OrderStatus::Completed;
    }

    /// Applies supplier, payment method and grouping changes. Allowed in any status.
    pub fn apply_details(&mut self, details: OrderDetails) {
        if let Some(supplier) = details.supplier {
            self.supplier = supplier;
        }
        if let Some(method) = details.method {
            self.payment.method = method;
        }
        if let Some(grouped) = details.grouped {
            self.grouped = grouped;
        }
    }
}
