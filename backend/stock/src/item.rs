//! # Inventory Items
//!
//! One document per flavor, keyed by the flavor name.
//!
//! ## Layout
//! - `currentStock`: units on hand now
//! - `maxStock`: everything ever stocked, the ceiling for corrections
//! - `targetStock`: reserve floor, sales should stop here
//! - `sellCount`: staged quantity that has not been confirmed yet, dropped from the
//!   JSON when zero
//!
//! Counts are unsigned so a negative number never makes it past deserialization.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Inventory = BTreeMap<String, InventoryItem>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub current_stock: u32,
    pub max_stock: u32,
    pub target_stock: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sell_count: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Selling,
}

impl InventoryItem {
    pub fn stocked(amount: u32) -> Self {
        Self {
            current_stock: amount,
            max_stock: amount,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.max_stock == 0 {
            Phase::Setup
        } else {
            Phase::Selling
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.current_stock == 0
    }

    /// Units sold so far, `maxStock - currentStock`.
    pub fn sold(&self) -> u32 {
        self.max_stock.saturating_sub(self.current_stock)
    }

    /// What customers can still buy, negative when the stock fell under the reserve.
    pub fn sellable(&self) -> i64 {
        i64::from(self.current_stock) - i64::from(self.target_stock)
    }

    /// Only the stock ceiling is a hard invariant. The target may end up above the
    /// current stock after sales, which the staff view reports.
    pub fn is_consistent(&self) -> bool {
        self.current_stock <= self.max_stock
    }

    /// Copy suitable for persisting, without the staged count.
    pub fn settled(&self) -> Self {
        Self {
            sell_count: 0,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let item = InventoryItem {
            current_stock: 70,
            max_stock: 100,
            target_stock: 20,
            sell_count: 0,
        };

        let json = serde_json::to_value(item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"currentStock": 70, "maxStock": 100, "targetStock": 20})
        );
    }

    #[test]
    fn test_sell_count_optional() {
        let item: InventoryItem =
            serde_json::from_str(r#"{"currentStock":5,"maxStock":5,"targetStock":0}"#).unwrap();
        assert_eq!(item.sell_count, 0);

        let item: InventoryItem = serde_json::from_str(
            r#"{"currentStock":5,"maxStock":5,"targetStock":0,"sellCount":3}"#,
        )
        .unwrap();
        assert_eq!(item.sell_count, 3);
    }

    #[test]
    fn test_negative_rejected() {
        let parsed = serde_json::from_str::<InventoryItem>(
            r#"{"currentStock":-1,"maxStock":5,"targetStock":0}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_derived_counts() {
        let item = InventoryItem {
            current_stock: 10,
            max_stock: 40,
            target_stock: 15,
            sell_count: 2,
        };

        assert_eq!(item.sold(), 30);
        assert_eq!(item.sellable(), -5);
        assert_eq!(item.phase(), Phase::Selling);
        assert_eq!(item.settled().sell_count, 0);
        assert_eq!(InventoryItem::default().phase(), Phase::Setup);
    }
}
