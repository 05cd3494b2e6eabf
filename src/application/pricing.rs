use crate::domain::order::{LineItem, OrderAdjustments, sort_by_sku};
use crate::domain::payment::{Installment, PaymentConfig, PaymentType};
use crate::domain::quote::{LineAllocation, PricedLineItem, PricedOrder, Totals};
use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use tracing::debug;

/// Allocates order-level adjustments over line items and builds installment plans.
///
/// Every operation is a pure function of its inputs, so callers can re-run it on
/// each edit and once more right before submission and get the same numbers,
/// provided the items arrive in the same order.
pub struct OrderPricingEngine;

impl OrderPricingEngine {
    /// Computes totals and per-line allocations for `items` in the order given.
    ///
    /// The net adjustment (shipping + other costs - discount) is spread evenly
    /// over every piece in the order, independent of unit prices. An empty
    /// order allocates nothing and its grand total is the bare adjustment,
    /// which may be negative.
    ///
    /// Arithmetic saturates at `Decimal::MIN`/`Decimal::MAX`, so amounts beyond
    /// the representable range price at the bound instead of failing.
    pub fn compute_totals(items: &[LineItem], adjustments: &OrderAdjustments) -> Totals {
        let items_total = items
            .iter()
            .map(LineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let total_pieces: u64 = items.iter().map(|item| u64::from(item.quantity)).sum();
        let additional_costs = adjustments.additional_costs();
        let grand_total = items_total
            .saturating_sub(adjustments.discount)
            .saturating_add(additional_costs);

        let cost_per_piece = if total_pieces > 0 {
            additional_costs.saturating_sub(adjustments.discount) / Decimal::from(total_pieces)
        } else {
            Decimal::ZERO
        };

        let lines = items
            .iter()
            .map(|item| {
                let quantity = Decimal::from(item.quantity);
                let allocated_cost_for_item = cost_per_piece.saturating_mul(quantity);
                let allocated_unit_cost = if item.quantity > 0 {
                    allocated_cost_for_item / quantity
                } else {
                    cost_per_piece
                };
                LineAllocation {
                    allocated_cost_for_item,
                    allocated_unit_cost,
                    purchase_cost: item.unit_price.saturating_add(cost_per_piece),
                    display_subtotal: item.subtotal().saturating_add(allocated_cost_for_item),
                }
            })
            .collect();

        Totals {
            items_total,
            grand_total,
            total_pieces,
            total_skus: items.len(),
            cost_per_piece,
            lines,
        }
    }

    /// Splits the grand total evenly over the configured schedule.
    ///
    /// Returns an empty plan for pay-in-full orders and for blank schedules.
    /// Amounts are not rounded, and no remainder is moved to the last
    /// installment.
    pub fn generate_installments(
        totals: &Totals,
        payment: &PaymentConfig,
        order_date: NaiveDate,
    ) -> Vec<Installment> {
        if payment.r#type != PaymentType::Installments {
            return Vec::new();
        }

        let schedule = payment.schedule();
        if schedule.is_empty() {
            return Vec::new();
        }

        let amount = totals.grand_total / Decimal::from(schedule.len());
        schedule
            .offsets()
            .iter()
            .enumerate()
            .map(|(index, &days)| Installment {
                number: index + 1,
                amount,
                due_date: due_date(order_date, days),
            })
            .collect()
    }

    /// Normalizes the items to SKU order, prices them and generates installments.
    ///
    /// This is the computation both the live preview and the submitted order use.
    pub fn price_order(
        items: &[LineItem],
        adjustments: &OrderAdjustments,
        payment: &PaymentConfig,
        order_date: NaiveDate,
    ) -> PricedOrder {
        let mut items = items.to_vec();
        sort_by_sku(&mut items);

        let totals = Self::compute_totals(&items, adjustments);
        let installments = Self::generate_installments(&totals, payment, order_date);

        debug!(
            skus = totals.total_skus,
            pieces = totals.total_pieces,
            grand_total = %totals.grand_total,
            installments = installments.len(),
            "Order priced"
        );

        let priced_items = items
            .into_iter()
            .zip(totals.lines.iter())
            .map(|(item, line)| PricedLineItem {
                product_id: item.product_id,
                sku: item.sku,
                quantity: item.quantity,
                unit_price: item.unit_price,
                allocated_cost: line.allocated_unit_cost,
                purchase_cost: line.purchase_cost,
                subtotal: line.display_subtotal,
            })
            .collect();

        PricedOrder {
            items_total: totals.items_total,
            grand_total: totals.grand_total,
            total_pieces: totals.total_pieces,
            total_skus: totals.total_skus,
            cost_per_piece: totals.cost_per_piece,
            items: priced_items,
            installments,
        }
    }
}

// Offsets that overflow the calendar fall back to the order date.
fn due_date(order_date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| order_date.checked_add_signed(delta))
        .unwrap_or(order_date)
}
