//! Cancellable periodic task.
//!
//! The owner starts a `RefreshTask`, which calls its callback once per period
//! on a tokio task until `stop` is awaited or the handle is dropped.

use anyhow::{anyhow, Result};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::logging::{log, obj, v_str, Domain, Level};

pub struct RefreshTask {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<u64>>,
}

impl RefreshTask {
    /// Spawn the task. The first call happens one full period after start.
    /// Must be called from within a tokio runtime.
    pub fn start<F>(name: &'static str, period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut(u64) + Send + 'static,
    {
        if period.is_zero() {
            return Err(anyhow!("refresh period for '{}' must be non-zero", name));
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = 0u64;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        ticks += 1;
                        on_tick(ticks);
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            ticks
        });
        log(
            Level::Info,
            Domain::Scheduler,
            "task_started",
            obj(&[("task", v_str(name)), ("period_ms", json!(period.as_millis() as u64))]),
        );
        Ok(Self {
            name,
            stop_tx,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Stop the task and return how many ticks it delivered.
    pub async fn stop(mut self) -> Result<u64> {
        let _ = self.stop_tx.send(true);
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("refresh task '{}' already stopped", self.name))?;
        let ticks = handle.await?;
        log(
            Level::Info,
            Domain::Scheduler,
            "task_stopped",
            obj(&[("task", v_str(self.name)), ("ticks", json!(ticks))]),
        );
        Ok(ticks)
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
