use crate::domain::order::LineItem;
use crate::error::{PricingError, Result};
use crate::interfaces::lenient::{deserialize_amount, deserialize_quantity};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct LineItemRecord {
    product_id: String,
    sku: String,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    quantity: u32,
    #[serde(default, deserialize_with = "deserialize_amount")]
    unit_price: Decimal,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        LineItem::new(record.product_id, record.sku, record.quantity, record.unit_price)
    }
}

/// Reads order line items from a CSV source.
///
/// Expects a `product_id, sku, quantity, unit_price` header. Whitespace is
/// trimmed and short rows are accepted; numeric columns that are missing or
/// not numbers read as zero. Only a row without a product id or SKU is an
/// error.
pub struct LineItemReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> LineItemReader<R> {
    /// Creates a new `LineItemReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes line items.
    pub fn items(self) -> impl Iterator<Item = Result<LineItem>> {
        self.reader.into_deserialize().map(|result| -> Result<LineItem> {
            let record: LineItemRecord = result.map_err(PricingError::from)?;
            if record.product_id.is_empty() || record.sku.is_empty() {
                return Err(PricingError::ValidationError(
                    "Line item is missing its product id or SKU".to_string(),
                ));
            }
            Ok(record.into())
        })
    }
}
