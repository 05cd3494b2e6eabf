use crate::domain::quote::PricedOrder;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Decimal places kept when printing amounts.
pub const DISPLAY_SCALE: u32 = 4;

#[derive(Serialize)]
struct QuoteRow<'a> {
    product_id: &'a str,
    sku: &'a str,
    quantity: u32,
    unit_price: Decimal,
    allocated_cost: Decimal,
    purchase_cost: Decimal,
    subtotal: Decimal,
}

fn display(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_SCALE).normalize()
}

/// Writes the priced lines of an order as CSV, one row per item.
///
/// Amounts are rounded to four decimal places for display only; the priced
/// order itself keeps full precision.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_quote(&mut self, quote: &PricedOrder) -> Result<()> {
        for item in &quote.items {
            self.writer.serialize(QuoteRow {
                product_id: &item.product_id,
                sku: &item.sku,
                quantity: item.quantity,
                unit_price: display(item.unit_price),
                allocated_cost: display(item.allocated_cost),
                purchase_cost: display(item.purchase_cost),
                subtotal: display(item.subtotal),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pricing::OrderPricingEngine;
    use crate::domain::order::{LineItem, OrderAdjustments};
    use crate::domain::payment::PaymentConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_quote_rows() {
        let quote = OrderPricingEngine::price_order(
            &[
                LineItem::new("p-b", "B", 2, dec!(10)),
                LineItem::new("p-a", "A", 1, dec!(5)),
            ],
            &OrderAdjustments::new(dec!(0), dec!(10), dec!(0)),
            &PaymentConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        let mut buffer = Vec::new();
        QuoteWriter::new(&mut buffer).write_quote(&quote).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "product_id,sku,quantity,unit_price,allocated_cost,purchase_cost,subtotal"
        );
        assert_eq!(lines[1], "p-a,A,1,5,3.3333,8.3333,8.3333");
        assert_eq!(lines[2], "p-b,B,2,10,3.3333,13.3333,26.6667");
    }

    #[test]
    fn test_write_empty_quote() {
        let mut buffer = Vec::new();
        QuoteWriter::new(&mut buffer)
            .write_quote(&PricedOrder::default())
            .unwrap();
        assert!(buffer.is_empty());
    }
}
