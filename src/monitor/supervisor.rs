//! Crash supervision for the poll loop.
//!
//! A panic escaping the loop is caught and the loop restarted in place, so
//! the change tracker survives. Restarts back off exponentially and stop
//! after a configurable number of consecutive crashes.

use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::SupervisorError;

use super::poll::Monitor;

const INITIAL_DELAY_SECS: u64 = 10;
const MAX_DELAY_SECS: u64 = 300;
const DEFAULT_MAX_RESTARTS: u32 = 20;
const HEALTHY_AFTER_SECS: u64 = 3600;

/// Restart behaviour after the poll loop crashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// `None` restarts forever.
    pub max_restarts: Option<u32>,
    /// A loop that ran at least this long before crashing resets the
    /// backoff and the restart count.
    pub healthy_after: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(INITIAL_DELAY_SECS),
            max_delay: Duration::from_secs(MAX_DELAY_SECS),
            max_restarts: Some(DEFAULT_MAX_RESTARTS),
            healthy_after: Duration::from_secs(HEALTHY_AFTER_SECS),
        }
    }
}

impl RestartPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_delay,
            initial_interval: self.initial_delay,
            max_interval: self.max_delay,
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl Monitor {
    /// Run the poll loop, restarting it after panics.
    ///
    /// Only returns once `max_restarts` consecutive restarts have been used.
    pub async fn run_supervised(
        &mut self,
        policy: &RestartPolicy,
    ) -> Result<Infallible, SupervisorError> {
        let mut backoff = policy.backoff();
        let mut restarts = 0u32;

        loop {
            let started = Instant::now();
            let last_panic = match AssertUnwindSafe(self.run()).catch_unwind().await {
                Ok(never) => match never {},
                Err(payload) => panic_message(payload.as_ref()),
            };

            if started.elapsed() >= policy.healthy_after {
                backoff.reset();
                restarts = 0;
            }

            if let Some(max) = policy.max_restarts
                && restarts >= max
            {
                error!("Poll loop crashed: {}. Restart limit ({}) reached", last_panic, max);
                return Err(SupervisorError::RestartLimitReached {
                    restarts,
                    last_panic,
                });
            }

            restarts += 1;
            let delay = backoff.next_backoff().unwrap_or(policy.max_delay);
            error!(
                "Poll loop crashed: {}, restarting in {}s (restart {})",
                last_panic,
                delay.as_secs(),
                restarts
            );
            tokio::time::sleep(delay).await;
            info!("Restarting poll loop");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
