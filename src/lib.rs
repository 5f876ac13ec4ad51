//! Checkout
//!
//! Checkout is a cart pricing, discount and promotion policy engine. Callers own the state: every
//! operation takes a snapshot and returns a new one.

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod schedule;
pub mod session;
pub mod state;
pub mod utils;
