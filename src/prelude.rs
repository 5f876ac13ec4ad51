//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartItem, ErrorKind, add_to_cart, change_quantity, remove_from_cart},
    catalog::{Catalog, CatalogError, LOW_STOCK_THRESHOLD},
    clock::{Clock, FixedClock, SystemClock},
    config::StoreConfig,
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError, reference_catalog},
    pricing::{AppliedDiscount, PricingPolicy, PricingResult, calculate_cart_total},
    products::{Product, ProductId},
    promotions::{
        Probability, PromotionConfig, PromotionEngine, PromotionError, PromotionEvent,
        PromotionKind,
    },
    receipt::{Receipt, ReceiptError, cart_total_summary},
    schedule::{PromotionSchedule, ScheduleConfig, ScheduleError, TimerConfig},
    session::Session,
    state::{AppState, Intent, Transition},
};
