//! Governance engine: the public, atomic surface over a ledger store.
//!
//! Every mutating call takes the ledger lock once, runs against a
//! [`WriteBatch`] over the locked store, and commits only if the whole
//! operation succeeded. Readers never observe a half-applied transfer or
//! delegation, and a failed call leaves no trace.
//!
//! Committed events go to the subscribers of the engine's [`EventBus`] after
//! the ledger lock is released, in commit order.

use crate::config::EngineConfig;
use crate::controller::{set_delegate, set_delegate_all};
use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent};
use crate::hook::on_balance_change;
use crate::meta::{self, DelegationRequest, DelegationScope};
use crate::power::{current_power, current_powers};
use quorum_crypto::{domain_separator, DomainConfig};
use quorum_store::{AccountRecord, LedgerStore, MemoryStore, WriteBatch};
use quorum_types::{Address, GovernancePowerType, Signature, Timestamp};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Shared delegation ledger.
pub struct GovernanceEngine<S: LedgerStore = MemoryStore> {
    store: Mutex<S>,
    domain: DomainConfig,
    domain_separator: [u8; 32],
    bus: Mutex<EventBus>,
}

impl GovernanceEngine<MemoryStore> {
    /// Engine over an empty in-memory ledger.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_store(config, MemoryStore::new())
    }

    /// Restore an engine from [`GovernanceEngine::save_state`] output.
    pub fn load_state(config: &EngineConfig, data: &[u8]) -> Result<Self, GovernanceError> {
        Ok(Self::with_store(config, MemoryStore::load_state(data)?))
    }

    /// Serialize the ledger for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        Ok(self.lock_store()?.save_state()?)
    }

    /// Run the full-scan consistency audit against the current ledger.
    pub fn audit(&self) -> Result<Vec<crate::audit::Discrepancy>, GovernanceError> {
        Ok(crate::audit::audit(&*self.lock_store()?)?)
    }
}

impl<S: LedgerStore> GovernanceEngine<S> {
    pub fn with_store(config: &EngineConfig, store: S) -> Self {
        let domain = config.domain();
        let domain_separator = domain_separator(&domain);
        info!(
            name = %domain.name,
            version = %domain.version,
            chain_id = domain.chain_id,
            "governance engine initialised"
        );
        Self {
            store: Mutex::new(store),
            domain,
            domain_separator,
            bus: Mutex::new(EventBus::new()),
        }
    }

    pub fn domain(&self) -> &DomainConfig {
        &self.domain
    }

    pub fn domain_separator(&self) -> [u8; 32] {
        self.domain_separator
    }

    /// Give the underlying store back, e.g. to persist it.
    pub fn into_store(self) -> Result<S, GovernanceError> {
        self.store
            .into_inner()
            .map_err(|_| GovernanceError::LockPoisoned)
    }

    // ── Events ─────────────────────────────────────────────────────────

    /// Register a listener for committed events. Listeners may query the
    /// engine but must not submit operations to it.
    pub fn subscribe(
        &self,
        listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>,
    ) -> Result<(), GovernanceError> {
        let mut bus = self.bus.lock().map_err(|_| GovernanceError::LockPoisoned)?;
        bus.subscribe(listener);
        debug!(listeners = bus.listener_count(), "event listener subscribed");
        Ok(())
    }

    // ── Delegation ─────────────────────────────────────────────────────

    /// `caller` delegates its own `kind` power to `delegatee`. The zero
    /// address or `caller` itself as delegatee withdraws the delegation.
    pub fn delegate_by_type(
        &self,
        caller: &Address,
        delegatee: &Address,
        kind: GovernancePowerType,
    ) -> Result<(), GovernanceError> {
        self.atomically(|batch| {
            Ok(set_delegate(batch, caller, *delegatee, kind)?
                .into_iter()
                .collect())
        })
    }

    /// `caller` delegates both dimensions to `delegatee`.
    pub fn delegate(&self, caller: &Address, delegatee: &Address) -> Result<(), GovernanceError> {
        self.atomically(|batch| set_delegate_all(batch, caller, *delegatee))
    }

    /// Apply a single-dimension delegation signed by `delegator`.
    pub fn meta_delegate_by_type(
        &self,
        delegator: &Address,
        delegatee: &Address,
        kind: GovernancePowerType,
        deadline: Timestamp,
        signature: &Signature,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let request = DelegationRequest {
            delegator: *delegator,
            delegatee: *delegatee,
            scope: DelegationScope::ByType(kind),
            deadline,
        };
        self.submit(&request, signature, now)
    }

    /// Apply a both-dimensions delegation signed by `delegator`.
    pub fn meta_delegate(
        &self,
        delegator: &Address,
        delegatee: &Address,
        deadline: Timestamp,
        signature: &Signature,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let request = DelegationRequest {
            delegator: *delegator,
            delegatee: *delegatee,
            scope: DelegationScope::All,
            deadline,
        };
        self.submit(&request, signature, now)
    }

    /// Apply any signed delegation request.
    pub fn submit(
        &self,
        request: &DelegationRequest,
        signature: &Signature,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let separator = self.domain_separator;
        self.atomically(|batch| meta::execute(batch, &separator, request, signature, now))
    }

    // ── Token movement ─────────────────────────────────────────────────

    pub fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        self.move_tokens(from, to, amount)
    }

    pub fn mint(&self, to: &Address, amount: u128) -> Result<(), GovernanceError> {
        self.move_tokens(&Address::ZERO, to, amount)
    }

    pub fn burn(&self, from: &Address, amount: u128) -> Result<(), GovernanceError> {
        self.move_tokens(from, &Address::ZERO, amount)
    }

    fn move_tokens(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        self.atomically(|batch| {
            on_balance_change(batch, from, to, amount)?;
            if from == to {
                return Ok(Vec::new());
            }
            Ok(vec![GovernanceEvent::Transfer {
                from: *from,
                to: *to,
                amount,
            }])
        })
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn account(&self, holder: &Address) -> Result<AccountRecord, GovernanceError> {
        Ok(self.lock_store()?.account(holder)?)
    }

    pub fn balance_of(&self, holder: &Address) -> Result<u128, GovernanceError> {
        Ok(self.account(holder)?.balance)
    }

    pub fn get_delegatee_by_type(
        &self,
        delegator: &Address,
        kind: GovernancePowerType,
    ) -> Result<Option<Address>, GovernanceError> {
        Ok(self.lock_store()?.delegatee(delegator, kind)?)
    }

    /// `(voting, proposition)` delegatees.
    pub fn get_delegates(
        &self,
        delegator: &Address,
    ) -> Result<(Option<Address>, Option<Address>), GovernanceError> {
        let store = self.lock_store()?;
        Ok((
            store.delegatee(delegator, GovernancePowerType::Voting)?,
            store.delegatee(delegator, GovernancePowerType::Proposition)?,
        ))
    }

    pub fn get_power_current(
        &self,
        holder: &Address,
        kind: GovernancePowerType,
    ) -> Result<u128, GovernanceError> {
        current_power(&*self.lock_store()?, holder, kind)
    }

    /// `(voting, proposition)` power.
    pub fn get_powers_current(&self, holder: &Address) -> Result<(u128, u128), GovernanceError> {
        current_powers(&*self.lock_store()?, holder)
    }

    /// Nonce the next signed request from `owner` must embed.
    pub fn nonces(&self, owner: &Address) -> Result<u64, GovernanceError> {
        Ok(self.lock_store()?.nonce(owner)?)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn lock_store(&self) -> Result<MutexGuard<'_, S>, GovernanceError> {
        self.store.lock().map_err(|_| GovernanceError::LockPoisoned)
    }

    /// Run `op` against a write batch; commit and publish its events only if
    /// it succeeds.
    fn atomically<F>(&self, op: F) -> Result<(), GovernanceError>
    where
        F: FnOnce(&mut WriteBatch<'_, S>) -> Result<Vec<GovernanceEvent>, GovernanceError>,
    {
        let mut store = self.lock_store()?;
        let (events, changes) = {
            let mut batch = WriteBatch::new(&*store);
            let events = op(&mut batch)?;
            (events, batch.into_changes())
        };
        if changes.is_empty() {
            debug!("nothing to commit");
        } else {
            debug!(writes = changes.len(), events = events.len(), "committing");
            changes.commit(&mut *store)?;
        }
        if events.is_empty() {
            return Ok(());
        }

        // The bus is taken before the ledger is released so that delivery
        // follows commit order. The operation has committed at this point,
        // so a poisoned bus must not turn it into an error.
        let bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        drop(store);
        for event in &events {
            bus.emit(event);
        }
        Ok(())
    }
}
