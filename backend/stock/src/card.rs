//! # Flavor Cards
//!
//! Staff side state machine, one card per flavor.
//!
//! A card starts in [`Phase::Setup`] until an initial stock is set, then stays in
//! [`Phase::Selling`] for good. Every action is a pure function of the current item,
//! returning the next item plus the side effects the caller has to carry out. A
//! rejected action returns a [`CardError`] and the caller keeps its old item.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{InventoryItem, Phase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SetInitialStock(u32),
    Increment,
    Decrement,
    Confirm,
    /// Stages `n` sold units for a correction. Only the total stock caps it, a sale
    /// that brought stock down to the sell bound can still be taken back.
    StageCorrection(u32),
    Correct,
    AdjustStock(i64),
    SetTarget(u32),
    SetSold(u32),
}

/// What caps the staged sell count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SellBound {
    /// Everything on hand can be staged.
    Stock,
    /// Staging stops at the reserve floor.
    #[default]
    AboveTarget,
}

impl FromStr for SellBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(SellBound::Stock),
            "above-target" | "target" => Ok(SellBound::AboveTarget),
            other => Err(format!("unknown sell bound '{other}'")),
        }
    }
}

impl SellBound {
    pub fn limit(self, item: &InventoryItem) -> u32 {
        match self {
            SellBound::Stock => item.current_stock,
            SellBound::AboveTarget => item.current_stock.saturating_sub(item.target_stock),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Persist,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub item: InventoryItem,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn local(item: InventoryItem) -> Self {
        Self {
            item,
            effects: Vec::new(),
        }
    }

    fn persisted(item: InventoryItem) -> Self {
        Self {
            item,
            effects: vec![Effect::Persist],
        }
    }

    pub fn needs_persist(&self) -> bool {
        self.effects.contains(&Effect::Persist)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CardError {
    #[error("Initial stock is already set")]
    AlreadyStocked,

    #[error("Set an initial stock first")]
    NotStocked,

    #[error("Cannot stage more than {bound} for sale")]
    SellLimit { bound: u32 },

    #[error("Nothing is staged")]
    NothingStaged,

    #[error("Staged {staged} but only {current} left")]
    NotEnoughStock { staged: u32, current: u32 },

    #[error("Correction would exceed the total stock of {max}")]
    ExceedsMax { max: u32 },

    #[error("Stock adjustment must not be zero")]
    ZeroAdjustment,

    #[error("Stock cannot go below zero")]
    NegativeStock,

    #[error("Target {target} is above the current stock of {current}")]
    TargetAboveStock { target: u32, current: u32 },

    #[error("Sold count {sold} is above the total stock of {max}")]
    SoldAboveMax { sold: u32, max: u32 },

    #[error("Value out of range")]
    OutOfRange,
}

pub fn apply(
    item: &InventoryItem,
    action: Action,
    bound: SellBound,
) -> Result<Transition, CardError> {
    let mut next = *item;

    match action {
        Action::SetInitialStock(amount) => {
            if item.phase() == Phase::Selling {
                return Err(CardError::AlreadyStocked);
            }

            Ok(Transition::persisted(InventoryItem::stocked(amount)))
        }
        _ if item.phase() == Phase::Setup => Err(CardError::NotStocked),
        Action::Increment => {
            let limit = bound.limit(item);
            if item.sell_count >= limit {
                return Err(CardError::SellLimit { bound: limit });
            }

            next.sell_count += 1;
            Ok(Transition::local(next))
        }
        Action::Decrement => {
            if item.sell_count == 0 {
                return Err(CardError::NothingStaged);
            }

            next.sell_count -= 1;
            Ok(Transition::local(next))
        }
        Action::Confirm => {
            if item.sell_count == 0 {
                return Err(CardError::NothingStaged);
            }
            if item.sell_count > item.current_stock {
                return Err(CardError::NotEnoughStock {
                    staged: item.sell_count,
                    current: item.current_stock,
                });
            }

            next.current_stock -= item.sell_count;
            next.sell_count = 0;
            Ok(Transition::persisted(next))
        }
        Action::StageCorrection(count) => {
            if count == 0 {
                return Err(CardError::NothingStaged);
            }
            if u64::from(item.current_stock) + u64::from(count) > u64::from(item.max_stock) {
                return Err(CardError::ExceedsMax {
                    max: item.max_stock,
                });
            }

            next.sell_count = count;
            Ok(Transition::local(next))
        }
        Action::Correct => {
            if item.sell_count == 0 {
                return Err(CardError::NothingStaged);
            }

            let restored = u64::from(item.current_stock) + u64::from(item.sell_count);
            if restored > u64::from(item.max_stock) {
                return Err(CardError::ExceedsMax {
                    max: item.max_stock,
                });
            }

            next.current_stock += item.sell_count;
            next.sell_count = 0;
            Ok(Transition::persisted(next))
        }
        Action::AdjustStock(delta) => {
            if delta == 0 {
                return Err(CardError::ZeroAdjustment);
            }

            let current = i64::from(item.current_stock) + delta;
            if current < 0 {
                return Err(CardError::NegativeStock);
            }
            let max = i64::from(item.max_stock) + delta;

            next.current_stock = u32::try_from(current).map_err(|_| CardError::OutOfRange)?;
            next.max_stock = u32::try_from(max).map_err(|_| CardError::OutOfRange)?;
            next.sell_count = next.sell_count.min(next.current_stock);
            Ok(Transition::persisted(next))
        }
        Action::SetTarget(target) => {
            if target > item.current_stock {
                return Err(CardError::TargetAboveStock {
                    target,
                    current: item.current_stock,
                });
            }

            next.target_stock = target;
            Ok(Transition::persisted(next))
        }
        Action::SetSold(sold) => {
            if sold > item.max_stock {
                return Err(CardError::SoldAboveMax {
                    sold,
                    max: item.max_stock,
                });
            }

            next.current_stock = item.max_stock - sold;
            next.sell_count = next.sell_count.min(next.current_stock);
            Ok(Transition::persisted(next))
        }
    }
}

/// Runs actions in order, stopping at the first rejection.
pub fn apply_all<I>(
    item: &InventoryItem,
    actions: I,
    bound: SellBound,
) -> Result<Transition, CardError>
where
    I: IntoIterator<Item = Action>,
{
    let mut state = Transition::local(*item);

    for action in actions {
        let step = apply(&state.item, action, bound)?;

        state.item = step.item;
        for effect in step.effects {
            if !state.effects.contains(&effect) {
                state.effects.push(effect);
            }
        }
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selling(current: u32, max: u32, target: u32) -> InventoryItem {
        InventoryItem {
            current_stock: current,
            max_stock: max,
            target_stock: target,
            sell_count: 0,
        }
    }

    fn stage(item: &InventoryItem, count: u32, bound: SellBound) -> InventoryItem {
        apply_all(item, (0..count).map(|_| Action::Increment), bound)
            .unwrap()
            .item
    }

    #[test]
    fn test_initial_stock() {
        let step = apply(
            &InventoryItem::default(),
            Action::SetInitialStock(100),
            SellBound::Stock,
        )
        .unwrap();

        assert_eq!(step.item, selling(100, 100, 0));
        assert!(step.needs_persist());
        assert_eq!(step.item.phase(), Phase::Selling);
    }

    #[test]
    fn test_initial_stock_zero_stays_in_setup() {
        let step = apply(
            &InventoryItem::default(),
            Action::SetInitialStock(0),
            SellBound::Stock,
        )
        .unwrap();

        assert_eq!(step.item.phase(), Phase::Setup);
    }

    #[test]
    fn test_initial_stock_only_once() {
        let item = selling(10, 10, 0);
        assert_eq!(
            apply(&item, Action::SetInitialStock(5), SellBound::Stock),
            Err(CardError::AlreadyStocked)
        );
    }

    #[test]
    fn test_setup_rejects_sales() {
        assert_eq!(
            apply(&InventoryItem::default(), Action::Increment, SellBound::Stock),
            Err(CardError::NotStocked)
        );
    }

    #[test]
    fn test_increment_bounds() {
        let item = selling(5, 10, 3);

        let staged = stage(&item, 2, SellBound::AboveTarget);
        assert_eq!(
            apply(&staged, Action::Increment, SellBound::AboveTarget),
            Err(CardError::SellLimit { bound: 2 })
        );

        let staged = stage(&item, 5, SellBound::Stock);
        assert_eq!(staged.sell_count, 5);
        assert_eq!(
            apply(&staged, Action::Increment, SellBound::Stock),
            Err(CardError::SellLimit { bound: 5 })
        );
    }

    #[test]
    fn test_increment_does_not_persist() {
        let step = apply(&selling(5, 5, 0), Action::Increment, SellBound::Stock).unwrap();
        assert!(!step.needs_persist());
    }

    #[test]
    fn test_decrement_floor() {
        let item = selling(5, 5, 0);
        assert_eq!(
            apply(&item, Action::Decrement, SellBound::Stock),
            Err(CardError::NothingStaged)
        );

        let staged = stage(&item, 2, SellBound::Stock);
        let step = apply(&staged, Action::Decrement, SellBound::Stock).unwrap();
        assert_eq!(step.item.sell_count, 1);
    }

    #[test]
    fn test_confirm_then_correct_round_trip() {
        let item = selling(50, 80, 0);
        let staged = stage(&item, 12, SellBound::Stock);

        let confirmed = apply(&staged, Action::Confirm, SellBound::Stock).unwrap().item;
        assert_eq!(confirmed.current_stock, 38);
        assert_eq!(confirmed.sell_count, 0);

        let restaged = stage(&confirmed, 12, SellBound::Stock);
        let corrected = apply(&restaged, Action::Correct, SellBound::Stock)
            .unwrap()
            .item;
        assert_eq!(corrected.current_stock, 50);
        assert_eq!(corrected.sell_count, 0);
    }

    #[test]
    fn test_correction_after_selling_to_the_bound() {
        let item = selling(70, 100, 20);
        let sold = apply(
            &stage(&item, 50, SellBound::AboveTarget),
            Action::Confirm,
            SellBound::AboveTarget,
        )
        .unwrap()
        .item;
        assert_eq!(sold.current_stock, 20);
        assert_eq!(
            apply(&sold, Action::Increment, SellBound::AboveTarget),
            Err(CardError::SellLimit { bound: 0 })
        );

        let corrected = apply_all(
            &sold,
            [Action::StageCorrection(1), Action::Correct],
            SellBound::AboveTarget,
        )
        .unwrap();
        assert_eq!(corrected.item.current_stock, 21);
        assert!(corrected.needs_persist());
    }

    #[test]
    fn test_full_sale_round_trips() {
        let item = selling(10, 10, 0);
        let sold = apply(&stage(&item, 10, SellBound::Stock), Action::Confirm, SellBound::Stock)
            .unwrap()
            .item;
        assert_eq!(sold.current_stock, 0);

        let corrected = apply_all(
            &sold,
            [Action::StageCorrection(10), Action::Correct],
            SellBound::Stock,
        )
        .unwrap();
        assert_eq!(corrected.item, item);
    }

    #[test]
    fn test_stage_correction_checks_total_stock() {
        let item = selling(8, 10, 0);

        assert_eq!(
            apply(&item, Action::StageCorrection(3), SellBound::Stock),
            Err(CardError::ExceedsMax { max: 10 })
        );
        assert_eq!(
            apply(&item, Action::StageCorrection(0), SellBound::Stock),
            Err(CardError::NothingStaged)
        );

        let step = apply(&item, Action::StageCorrection(2), SellBound::Stock).unwrap();
        assert_eq!(step.item.sell_count, 2);
        assert!(!step.needs_persist());
    }

    #[test]
    fn test_confirm_requires_stock() {
        let mut item = selling(3, 10, 0);
        item.sell_count = 4;

        assert_eq!(
            apply(&item, Action::Confirm, SellBound::Stock),
            Err(CardError::NotEnoughStock {
                staged: 4,
                current: 3
            })
        );
        assert_eq!(
            apply(&selling(3, 10, 0), Action::Confirm, SellBound::Stock),
            Err(CardError::NothingStaged)
        );
    }

    #[test]
    fn test_correct_capped_by_max() {
        let item = stage(&selling(9, 10, 0), 2, SellBound::Stock);

        assert_eq!(
            apply(&item, Action::Correct, SellBound::Stock),
            Err(CardError::ExceedsMax { max: 10 })
        );
    }

    #[test]
    fn test_sequences_keep_stock_in_range() {
        let mut item = selling(20, 20, 0);
        let counts = [3, 7, 1, 9, 4, 20, 2, 5];

        for (round, count) in counts.into_iter().enumerate() {
            let staged = apply_all(
                &item,
                (0..count).map(|_| Action::Increment),
                SellBound::Stock,
            )
            .map(|step| step.item)
            .unwrap_or(item);

            let action = if round % 3 == 2 {
                Action::Correct
            } else {
                Action::Confirm
            };

            if let Ok(step) = apply(&staged, action, SellBound::Stock) {
                item = step.item;
            }

            assert!(item.current_stock <= item.max_stock);
        }
    }

    #[test]
    fn test_adjust_stock() {
        let item = selling(5, 10, 0);

        let step = apply(&item, Action::AdjustStock(15), SellBound::Stock).unwrap();
        assert_eq!(step.item, selling(20, 25, 0));

        let step = apply(&item, Action::AdjustStock(-5), SellBound::Stock).unwrap();
        assert_eq!(step.item, selling(0, 5, 0));

        assert_eq!(
            apply(&item, Action::AdjustStock(-6), SellBound::Stock),
            Err(CardError::NegativeStock)
        );
        assert_eq!(
            apply(&item, Action::AdjustStock(0), SellBound::Stock),
            Err(CardError::ZeroAdjustment)
        );
    }

    #[test]
    fn test_target_above_stock_rejected() {
        let item = selling(10, 10, 2);

        assert_eq!(
            apply(&item, Action::SetTarget(11), SellBound::Stock),
            Err(CardError::TargetAboveStock {
                target: 11,
                current: 10
            })
        );

        let step = apply(&item, Action::SetTarget(10), SellBound::Stock).unwrap();
        assert_eq!(step.item.target_stock, 10);
    }

    #[test]
    fn test_set_sold() {
        let item = selling(10, 30, 0);

        let step = apply(&item, Action::SetSold(25), SellBound::Stock).unwrap();
        assert_eq!(step.item.current_stock, 5);

        assert_eq!(
            apply(&item, Action::SetSold(31), SellBound::Stock),
            Err(CardError::SoldAboveMax { sold: 31, max: 30 })
        );
    }

    #[test]
    fn test_apply_all_stops_on_rejection() {
        let item = selling(2, 2, 0);
        let result = apply_all(
            &item,
            [Action::Increment, Action::Increment, Action::Increment],
            SellBound::Stock,
        );

        assert_eq!(result, Err(CardError::SellLimit { bound: 2 }));
    }
}
