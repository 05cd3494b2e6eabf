use super::payment::Installment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost allocation for a single line, aligned with the input item order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAllocation {
    /// Share of the order adjustments carried by the whole line.
    pub allocated_cost_for_item: Decimal,
    /// `allocated_cost_for_item / quantity`.
    pub allocated_unit_cost: Decimal,
    pub purchase_cost: Decimal,
    pub display_subtotal: Decimal,
}

/// Result of a pricing run over a snapshot of line items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Totals {
    pub items_total: Decimal,
    pub grand_total: Decimal,
    pub total_pieces: u64,
    pub total_skus: usize,
    pub cost_per_piece: Decimal,
    pub lines: Vec<LineAllocation>,
}

impl Totals {
    pub fn allocated_cost_for_item(&self) -> Vec<Decimal> {
        self.lines
            .iter()
            .map(|line| line.allocated_cost_for_item)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItem {
    pub product_id: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Per-unit allocated cost.
    pub allocated_cost: Decimal,
    pub purchase_cost: Decimal,
    /// Line subtotal including the line's full allocated cost.
    pub subtotal: Decimal,
}

/// The priced order handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOrder {
    pub items_total: Decimal,
    pub grand_total: Decimal,
    pub total_pieces: u64,
    pub total_skus: usize,
    pub cost_per_piece: Decimal,
    pub items: Vec<PricedLineItem>,
    pub installments: Vec<Installment>,
}
