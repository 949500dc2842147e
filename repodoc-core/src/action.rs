//! Per-affordance state machine: `Idle -> Busy -> {Succeeded, Failed} -> Idle`.
//!
//! Each user-triggerable action (connect, generate) owns one [`Affordance`].
//! A trigger while the affordance is busy is rejected with an `Input` error;
//! overlapping calls are never queued.

use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{RepoDocError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Busy,
    Succeeded,
    Failed,
}

impl ActionState {
    pub fn trigger(self) -> Result<ActionState> {
        match self {
            ActionState::Idle => Ok(ActionState::Busy),
            ActionState::Busy => Err(RepoDocError::Input(
                "action already in progress".to_string(),
            )),
            // Outcome not yet acknowledged; acknowledging is implicit on a new trigger.
            ActionState::Succeeded | ActionState::Failed => Ok(ActionState::Busy),
        }
    }

    pub fn complete(self, success: bool) -> ActionState {
        match (self, success) {
            (ActionState::Busy, true) => ActionState::Succeeded,
            (ActionState::Busy, false) => ActionState::Failed,
            (other, _) => other,
        }
    }

    pub fn settle(self) -> ActionState {
        match self {
            ActionState::Succeeded | ActionState::Failed => ActionState::Idle,
            other => other,
        }
    }

    /// Whether the affordance accepts a new trigger.
    pub fn is_enabled(self) -> bool {
        self != ActionState::Busy
    }
}

pub struct Affordance {
    name: &'static str,
    state: Mutex<ActionState>,
}

impl Affordance {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(ActionState::Idle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> ActionState {
        *self.lock()
    }

    /// Run `action` with the affordance held busy. Whatever the outcome, the
    /// affordance is back to `Idle` when this returns.
    pub async fn run<T, F>(&self, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        {
            let mut state = self.lock();
            *state = state.trigger().inspect_err(|_| {
                warn!(action = self.name, "Rejected trigger while busy");
            })?;
        }
        debug!(action = self.name, "Busy");

        let mut guard = SettleGuard {
            affordance: self,
            success: false,
        };
        let result = action.await;
        guard.success = result.is_ok();
        drop(guard);
        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ActionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Restores the affordance on every exit path, including a dropped future.
struct SettleGuard<'a> {
    affordance: &'a Affordance,
    success: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.affordance.lock();
        let outcome = state.complete(self.success);
        debug!(action = self.affordance.name, ?outcome, "Settled");
        *state = outcome.settle();
    }
}
