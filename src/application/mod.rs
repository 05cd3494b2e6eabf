//! Application layer: the pricing engine and the order workflow built on it.
//!
//! `OrderPricingEngine` is pure and can run on every edit. `OrderService`
//! validates drafts, prices them once more before persisting and enforces the
//! pending/completed lifecycle.

pub mod orders;
pub mod pricing;
