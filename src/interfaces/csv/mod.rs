pub mod line_item_reader;
pub mod quote_writer;
