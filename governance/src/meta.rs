//! Signed delegation: a third party submits a delegation the delegator
//! authorized off-line with a typed-data signature.
//!
//! The signed message embeds the delegator's *current* nonce. A successful
//! submission advances the nonce, so resubmitting the same signature recovers
//! a different signer and fails.

use crate::controller::{set_delegate, set_delegate_all};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use quorum_crypto::{
    delegate_by_type_struct_hash, delegate_struct_hash, recover_signer, typed_data_digest,
};
use quorum_store::LedgerStore;
use quorum_types::{Address, GovernancePowerType, Signature, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which dimensions a signed request covers. Each scope has its own type tag,
/// so a signature for one never validates as the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationScope {
    ByType(GovernancePowerType),
    All,
}

/// The fields a delegator signs, minus the nonce, which is read from the
/// ledger at submission time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRequest {
    pub delegator: Address,
    pub delegatee: Address,
    pub scope: DelegationScope,
    pub deadline: Timestamp,
}

impl DelegationRequest {
    pub fn struct_hash(&self, nonce: u64) -> [u8; 32] {
        match self.scope {
            DelegationScope::ByType(kind) => delegate_by_type_struct_hash(
                &self.delegator,
                &self.delegatee,
                kind,
                nonce,
                self.deadline,
            ),
            DelegationScope::All => {
                delegate_struct_hash(&self.delegator, &self.delegatee, nonce, self.deadline)
            }
        }
    }

    /// The digest the delegator must sign for `nonce`.
    pub fn digest(&self, domain_separator: &[u8; 32], nonce: u64) -> [u8; 32] {
        typed_data_digest(domain_separator, &self.struct_hash(nonce))
    }
}

/// Check the request against the delegator's signature and consume its nonce.
pub fn authorize<S: LedgerStore>(
    store: &mut S,
    domain_separator: &[u8; 32],
    request: &DelegationRequest,
    signature: &Signature,
    now: Timestamp,
) -> Result<(), GovernanceError> {
    let delegator = request.delegator;
    if delegator.is_zero() {
        return Err(GovernanceError::InvalidOwner);
    }
    if request.deadline.is_passed(now) {
        return Err(GovernanceError::ExpiredAuthorization {
            deadline: request.deadline,
            now,
        });
    }

    let nonce = store.nonce(&delegator)?;
    let digest = request.digest(domain_separator, nonce);
    let signer = recover_signer(&digest, signature).map_err(|e| {
        warn!(%delegator, nonce, error = %e, "signature did not recover");
        GovernanceError::InvalidSignature
    })?;
    if signer != delegator {
        warn!(%delegator, %signer, nonce, "signature from wrong signer");
        return Err(GovernanceError::InvalidSignature);
    }

    let next = nonce
        .checked_add(1)
        .ok_or(GovernanceError::NonceExhausted(delegator))?;
    store.put_nonce(&delegator, next)?;
    Ok(())
}

/// Authorize `request` and apply it through the delegation controller.
pub fn execute<S: LedgerStore>(
    store: &mut S,
    domain_separator: &[u8; 32],
    request: &DelegationRequest,
    signature: &Signature,
    now: Timestamp,
) -> Result<Vec<GovernanceEvent>, GovernanceError> {
    authorize(store, domain_separator, request, signature, now)?;
    match request.scope {
        DelegationScope::ByType(kind) => {
            Ok(set_delegate(store, &request.delegator, request.delegatee, kind)?
                .into_iter()
                .collect())
        }
        DelegationScope::All => set_delegate_all(store, &request.delegator, request.delegatee),
    }
}
