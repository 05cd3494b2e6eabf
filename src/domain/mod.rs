pub mod ean;
pub mod order;
pub mod payment;
pub mod ports;
pub mod quote;
