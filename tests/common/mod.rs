use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "product_id, sku, quantity, unit_price";

/// Writes an items CSV with the standard header followed by `rows`.
pub fn items_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}
