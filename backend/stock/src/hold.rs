//! # Press and Hold
//!
//! Holding a counter button fires the action once right away, waits for
//! [`HoldTiming::delay`], then repeats every [`HoldTiming::period`].
//!
//! The repeating task belongs to the [`HoldRepeat`] handle. It stops on any of:
//! - `release()`, for pointer up, pointer leave or touch cancel
//! - the handle being dropped
//! - the action returning `false`, e.g. the counter reached its bound
//!
//! Needs a Tokio runtime since the repeat runs as a spawned task.
use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at, sleep},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldTiming {
    pub delay: Duration,
    pub period: Duration,
}

impl Default for HoldTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            period: Duration::from_millis(100),
        }
    }
}

pub struct HoldRepeat {
    task: Option<JoinHandle<()>>,
}

impl HoldRepeat {
    pub fn press<F>(timing: HoldTiming, mut action: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        if !action() {
            return Self { task: None };
        }

        let task = tokio::spawn(async move {
            sleep(timing.delay).await;

            let mut ticker = interval_at(Instant::now() + timing.period, timing.period);
            loop {
                ticker.tick().await;

                if !action() {
                    break;
                }
            }
        });

        Self { task: Some(task) }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn release(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for HoldRepeat {
    fn drop(&mut self) {
        self.cancel();
    }
}
