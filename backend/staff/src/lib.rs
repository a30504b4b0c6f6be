//! # Staff Client
//!
//! Terminal counterpart of the staff page.
//!
//! ## Flow
//! 1. Fetch the flavor from the server, a flavor the server has never seen starts in setup
//! 2. Run the card actions locally through [`stock::card`], staging a sale one increment
//!    at a time so the sell bound applies exactly as on the page
//! 3. If the transition asks for it, save that one flavor with `PUT /api/inventory/{name}`
//!
//! A held `+` button is replayed with [`stock::hold::HoldRepeat`], the hold stages as
//! many units as the timing and the sell bound allow before the sale is confirmed.
//!
//! Rejected actions never reach the server. A failed save is reported once and the
//! local result is not rolled back.
use std::{
    iter::{once, repeat_n},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use stock::{
    Action, Inventory, InventoryItem, SellBound, apply, apply_all,
    hold::{HoldRepeat, HoldTiming},
};
use tokio::{sync::watch, time::sleep};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Setup(u32),
    Sell(u32),
    Correct(u32),
    Restock(i64),
    Target(u32),
    Sold(u32),
}

impl Operation {
    /// The card actions in order. A sale is staged one increment at a time, a
    /// correction is staged in one step since the sell bound does not cap it.
    pub fn actions(self) -> impl Iterator<Item = Action> {
        let (stage, increments, finish) = match self {
            Operation::Setup(amount) => (None, 0, Action::SetInitialStock(amount)),
            Operation::Sell(count) => (None, count, Action::Confirm),
            Operation::Correct(count) => (Some(Action::StageCorrection(count)), 0, Action::Correct),
            Operation::Restock(delta) => (None, 0, Action::AdjustStock(delta)),
            Operation::Target(target) => (None, 0, Action::SetTarget(target)),
            Operation::Sold(sold) => (None, 0, Action::SetSold(sold)),
        };

        stage
            .into_iter()
            .chain(repeat_n(Action::Increment, increments as usize))
            .chain(once(finish))
    }
}

/// Holds the increment button for `held` and returns the card with whatever got staged.
pub async fn hold_increment(
    item: InventoryItem,
    held: Duration,
    timing: HoldTiming,
    bound: SellBound,
) -> InventoryItem {
    let (card, staged) = watch::channel(item);

    let hold = HoldRepeat::press(timing, move || {
        let step = apply(&card.borrow(), Action::Increment, bound);
        match step {
            Ok(step) => {
                card.send_replace(step.item);
                true
            }
            Err(_) => false,
        }
    });

    sleep(held).await;
    hold.release();

    *staged.borrow()
}

fn flavor_name(name: &str) -> Result<String> {
    let name = stock::utils::sanitize(name);
    if name.is_empty() {
        bail!("flavor name is empty");
    }

    Ok(name)
}

#[derive(Serialize, Deserialize)]
struct Headline {
    headline: String,
}

pub struct StaffClient {
    http: Client,
    base: Url,
}

impl StaffClient {
    pub fn new(server: &str) -> Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server url {server}"))?;

        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("server url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    pub async fn inventory(&self) -> Result<Inventory> {
        let response = self
            .http
            .get(self.endpoint(&["api", "inventory"])?)
            .send()
            .await
            .context("server unreachable")?
            .error_for_status()
            .context("failed to fetch inventory")?;

        Ok(response.json().await?)
    }

    pub async fn item(&self, name: &str) -> Result<InventoryItem> {
        let response = self
            .http
            .get(self.endpoint(&["api", "inventory", name])?)
            .send()
            .await
            .context("server unreachable")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(InventoryItem::default());
        }

        let response = response
            .error_for_status()
            .with_context(|| format!("failed to fetch {name}"))?;

        Ok(response.json().await?)
    }

    pub async fn save(&self, name: &str, item: &InventoryItem) -> Result<()> {
        self.http
            .put(self.endpoint(&["api", "inventory", name])?)
            .json(&item.settled())
            .send()
            .await
            .context("server unreachable")?
            .error_for_status()
            .context("failed to save data")?;

        Ok(())
    }

    pub async fn headline(&self) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint(&["api", "headline"])?)
            .send()
            .await
            .context("server unreachable")?
            .error_for_status()
            .context("failed to fetch headline")?;

        Ok(response.json::<Headline>().await?.headline)
    }

    pub async fn set_headline(&self, headline: &str) -> Result<()> {
        self.http
            .post(self.endpoint(&["api", "headline"])?)
            .json(&Headline {
                headline: headline.to_string(),
            })
            .send()
            .await
            .context("server unreachable")?
            .error_for_status()
            .context("failed to save headline")?;

        Ok(())
    }

    /// Applies `operation` to one flavor and saves it when the card asks for a save.
    pub async fn run(
        &self,
        name: &str,
        operation: Operation,
        bound: SellBound,
    ) -> Result<InventoryItem> {
        let name = flavor_name(name)?;

        let current = self.item(&name).await?;
        let transition = apply_all(&current, operation.actions(), bound)?;

        if transition.needs_persist() {
            self.save(&name, &transition.item).await?;
        }

        Ok(transition.item)
    }

    /// Sells whatever a hold of the increment button stages, like the page's `+` button.
    pub async fn hold_sell(
        &self,
        name: &str,
        held: Duration,
        timing: HoldTiming,
        bound: SellBound,
    ) -> Result<InventoryItem> {
        let name = flavor_name(name)?;

        let current = self.item(&name).await?;
        let staged = hold_increment(current, held, timing, bound).await;
        let transition = apply(&staged, Action::Confirm, bound)?;

        self.save(&name, &transition.item).await?;
        Ok(transition.item)
    }
}
