//! # Stock
//!
//! Shared inventory logic for the stand, used by the server and the staff client.
//!
//! - [`item`]: the per-flavor document and the inventory map
//! - [`card`]: staff actions as pure transitions
//! - [`view`]: staff card and customer display derivations
//! - [`hold`]: press-and-hold repeat for the counter buttons

pub mod card;
pub mod hold;
pub mod item;
pub mod utils;
pub mod view;

pub use card::{Action, CardError, Effect, SellBound, Transition, apply, apply_all};
pub use item::{Inventory, InventoryItem, Phase};
pub use view::{DisplayMode, FlavorDisplay, GoalBasis, customer_view, sell_through, staff_view};

pub const DEFAULT_HEADLINE: &str = "残り……";

/// Flavors a fresh store starts with, all in setup.
pub const DEFAULT_FLAVORS: [&str; 4] = [
    "ストロベリーチーズケーキ",
    "レインボー",
    "ハニーコットンキャンディ",
    "クッキー＆クリーム",
];
