//! Notifications emitted by committed operations.

use quorum_types::{Address, GovernancePowerType};
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Events observers can subscribe to via the [`EventBus`].
///
/// Only committed operations produce events; a failed operation emits nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// A delegator's delegatee for one dimension changed. `delegatee` is
    /// `None` when the delegator took the dimension back.
    DelegateChanged {
        delegator: Address,
        delegatee: Option<Address>,
        kind: GovernancePowerType,
    },
    /// Tokens moved. A zero `from` is a mint, a zero `to` a burn.
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
}

/// Synchronous fan-out event bus.
///
/// A listener that panics is logged and skipped; the remaining listeners
/// still see the event.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for (index, listener) in self.listeners.iter().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(listener = index, ?event, "event listener panicked");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
