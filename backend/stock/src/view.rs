//! # Views
//!
//! Read-only derivations over the inventory, one for the staff cards and one for
//! the customer display. Nothing here mutates an item.
//!
//! ## Customer Display
//! - `sellable = currentStock - targetStock`, sold out at zero or below
//! - One flavor is recommended: the largest sellable count within [10, 99]
//! - Count mode shows the sellable count, percent mode the sell-through
//!
//! ## Sell-Through
//! `sold = maxStock - currentStock` over a goal picked by [`GoalBasis`]. Both goals
//! have been used on the stand, so the basis is configuration rather than a constant.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    card::SellBound,
    item::{Inventory, InventoryItem, Phase},
};

pub const SOLD_OUT_LABEL: &str = "完売";

const RECOMMEND_MIN: i64 = 10;
const RECOMMEND_MAX: i64 = 99;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Count,
    Percent,
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(DisplayMode::Count),
            "percent" | "percentage" => Ok(DisplayMode::Percent),
            other => Err(format!("unknown display mode '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalBasis {
    #[default]
    #[serde(rename = "max")]
    MaxStock,
    MaxMinusTarget,
}

impl FromStr for GoalBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "max-stock" => Ok(GoalBasis::MaxStock),
            "max-minus-target" => Ok(GoalBasis::MaxMinusTarget),
            other => Err(format!("unknown goal basis '{other}'")),
        }
    }
}

impl GoalBasis {
    pub fn goal(self, item: &InventoryItem) -> u32 {
        match self {
            GoalBasis::MaxStock => item.max_stock,
            GoalBasis::MaxMinusTarget => item.max_stock.saturating_sub(item.target_stock),
        }
    }
}

/// Whole percent of the goal already sold, capped at 100. `None` without a goal.
pub fn sell_through(item: &InventoryItem, basis: GoalBasis) -> Option<u32> {
    let goal = u64::from(basis.goal(item));
    if goal == 0 {
        return None;
    }

    let percent = u64::from(item.sold()) * 100 / goal;
    Some(percent.min(100) as u32)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorDisplay {
    pub name: String,
    pub sellable: i64,
    pub sold_out: bool,
    pub recommended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u32>,
}

impl fmt::Display for FlavorDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.recommended { " ★" } else { "" };

        if self.sold_out {
            return write!(f, "{}{mark}: {SOLD_OUT_LABEL}", self.name);
        }

        match (self.count, self.percent) {
            (Some(count), _) => write!(f, "{}{mark}: {count}個", self.name),
            (None, Some(percent)) => write!(f, "{}{mark}: {percent}%", self.name),
            (None, None) => write!(f, "{}{mark}: -", self.name),
        }
    }
}

fn recommended(inventory: &Inventory) -> Option<&str> {
    let mut best: Option<(&str, i64)> = None;

    for (name, item) in inventory {
        let sellable = item.sellable();
        if !(RECOMMEND_MIN..=RECOMMEND_MAX).contains(&sellable) {
            continue;
        }

        if best.is_none_or(|(_, top)| sellable > top) {
            best = Some((name, sellable));
        }
    }

    best.map(|(name, _)| name)
}

pub fn customer_view(
    inventory: &Inventory,
    mode: DisplayMode,
    basis: GoalBasis,
) -> Vec<FlavorDisplay> {
    let pick = recommended(inventory);

    inventory
        .iter()
        .map(|(name, item)| {
            let sellable = item.sellable();
            let sold_out = sellable <= 0;

            let (count, percent) = match mode {
                DisplayMode::Count if !sold_out => (u32::try_from(sellable).ok(), None),
                DisplayMode::Count => (None, None),
                DisplayMode::Percent => (None, sell_through(item, basis)),
            };

            FlavorDisplay {
                name: name.clone(),
                sellable,
                sold_out,
                recommended: pick == Some(name.as_str()),
                count,
                percent,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "remaining")]
pub enum TargetStatus {
    Unset,
    Remaining(u32),
    BelowTarget,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Unset => Ok(()),
            TargetStatus::Remaining(count) => write!(f, "目標まであと {count} 個"),
            TargetStatus::BelowTarget => write!(f, "目標在庫を下回っています"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub phase: Phase,
    pub current_stock: u32,
    pub max_stock: u32,
    pub sell_count: u32,
    pub sold_out: bool,
    pub can_increment: bool,
    pub can_confirm: bool,
    pub target: TargetStatus,
}

pub fn staff_view(item: &InventoryItem, bound: SellBound) -> CardView {
    let sold_out = item.is_sold_out();

    let target = match item.target_stock {
        0 => TargetStatus::Unset,
        target if item.current_stock >= target => {
            TargetStatus::Remaining(item.current_stock - target)
        }
        _ => TargetStatus::BelowTarget,
    };

    CardView {
        phase: item.phase(),
        current_stock: item.current_stock,
        max_stock: item.max_stock,
        sell_count: item.sell_count,
        sold_out,
        can_increment: !sold_out && item.sell_count < bound.limit(item),
        can_confirm: !sold_out && item.sell_count > 0,
        target,
    }
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Setup => write!(f, "未設定")?,
            Phase::Selling if self.sold_out => write!(f, "{SOLD_OUT_LABEL}")?,
            Phase::Selling => write!(f, "残り: {}個 / {}", self.current_stock, self.max_stock)?,
        }

        if self.sell_count > 0 {
            write!(f, " (販売予定 {})", self.sell_count)?;
        }
        if self.target != TargetStatus::Unset {
            write!(f, " {}", self.target)?;
        }

        Ok(())
    }
}
