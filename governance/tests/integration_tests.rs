//! End-to-end tests through the public engine surface: direct and signed
//! delegation, balance movement, power queries, rollback and persistence.

use quorum_governance::{EngineConfig, GovernanceEngine, GovernanceError, GovernanceEvent};
use quorum_nullables::{NullClock, NullSigner};
use quorum_types::{Address, GovernancePowerType, Signature, Timestamp, POWER_SCALE_FACTOR};
use std::sync::{Arc, Mutex};

const SCALE: u128 = POWER_SCALE_FACTOR;
const VOTING: GovernancePowerType = GovernancePowerType::Voting;
const PROPOSITION: GovernancePowerType = GovernancePowerType::Proposition;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine() -> GovernanceEngine {
    GovernanceEngine::new(&EngineConfig::default())
}

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

/// Subscribe a listener that keeps every event committed from now on.
fn record(engine: &GovernanceEngine) -> Arc<Mutex<Vec<GovernanceEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine
        .subscribe(Box::new(move |event| {
            sink.lock().unwrap().push(event.clone());
        }))
        .unwrap();
    seen
}

fn delegated(engine: &GovernanceEngine, who: &Address, kind: GovernancePowerType) -> u128 {
    engine.account(who).unwrap().delegated_power(kind)
}

// ---------------------------------------------------------------------------
// 1. Delegation accounting
// ---------------------------------------------------------------------------

#[test]
fn transfer_between_two_delegators_of_bob() {
    let engine = engine();
    let (alice, bob, carol) = (addr(0xA1), addr(0xB0), addr(0xC4));
    engine.mint(&alice, 5 * SCALE).unwrap();
    engine.delegate_by_type(&alice, &bob, VOTING).unwrap();
    assert_eq!(delegated(&engine, &bob, VOTING), 5);

    engine.delegate_by_type(&carol, &bob, VOTING).unwrap();
    engine.transfer(&alice, &carol, 3 * SCALE).unwrap();

    assert_eq!(engine.balance_of(&alice).unwrap(), 2 * SCALE);
    assert_eq!(engine.balance_of(&carol).unwrap(), 3 * SCALE);
    assert_eq!(delegated(&engine, &bob, VOTING), 5);
    assert!(engine.audit().unwrap().is_empty());
}

#[test]
fn bob_current_power_includes_own_balance() {
    let engine = engine();
    let (alice, bob, carol) = (addr(0xA1), addr(0xB0), addr(0xC4));
    engine.mint(&alice, 5 * SCALE).unwrap();
    engine.mint(&bob, 7).unwrap();
    engine.delegate_by_type(&alice, &bob, VOTING).unwrap();
    engine.delegate_by_type(&carol, &bob, VOTING).unwrap();
    engine.transfer(&alice, &carol, 3 * SCALE).unwrap();

    assert_eq!(
        engine.get_power_current(&bob, VOTING).unwrap(),
        5 * SCALE + 7
    );
    // Bob delegating voting away drops his own balance from his voting power.
    engine.delegate_by_type(&bob, &alice, VOTING).unwrap();
    assert_eq!(engine.get_power_current(&bob, VOTING).unwrap(), 5 * SCALE);
    assert_eq!(engine.get_power_current(&bob, PROPOSITION).unwrap(), 7);
}

#[test]
fn redelegation_moves_power() {
    let engine = engine();
    engine.mint(&addr(1), 4 * SCALE + 123).unwrap();
    engine.delegate(&addr(1), &addr(2)).unwrap();
    engine.delegate_by_type(&addr(1), &addr(3), PROPOSITION).unwrap();

    assert_eq!(delegated(&engine, &addr(2), VOTING), 4);
    assert_eq!(delegated(&engine, &addr(2), PROPOSITION), 0);
    assert_eq!(delegated(&engine, &addr(3), PROPOSITION), 4);
    assert_eq!(
        engine.get_delegates(&addr(1)).unwrap(),
        (Some(addr(2)), Some(addr(3)))
    );
}

#[test]
fn self_delegation_equals_undelegation() {
    let engine = engine();
    engine.mint(&addr(1), 2 * SCALE).unwrap();
    engine.delegate(&addr(1), &addr(2)).unwrap();

    engine.delegate_by_type(&addr(1), &addr(1), VOTING).unwrap();
    engine.delegate_by_type(&addr(1), &Address::ZERO, PROPOSITION).unwrap();

    let record = engine.account(&addr(1)).unwrap();
    assert!(!record.is_delegating_any());
    assert_eq!(engine.get_delegates(&addr(1)).unwrap(), (None, None));
    assert_eq!(delegated(&engine, &addr(2), VOTING), 0);
    assert_eq!(delegated(&engine, &addr(2), PROPOSITION), 0);
    assert_eq!(engine.get_powers_current(&addr(1)).unwrap(), (2 * SCALE, 2 * SCALE));
}

#[test]
fn repeated_delegation_is_silent() {
    let engine = engine();
    engine.delegate(&addr(1), &addr(2)).unwrap();
    let seen = record(&engine);
    let before = engine.save_state().unwrap();

    engine.delegate(&addr(1), &addr(2)).unwrap();
    engine.delegate_by_type(&addr(3), &addr(3), VOTING).unwrap();

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(engine.save_state().unwrap(), before);
}

#[test]
fn dust_below_scale_carries_no_power() {
    let engine = engine();
    engine.mint(&addr(1), SCALE - 1).unwrap();
    engine.delegate(&addr(1), &addr(2)).unwrap();
    assert_eq!(delegated(&engine, &addr(2), VOTING), 0);
    assert_eq!(engine.get_power_current(&addr(2), VOTING).unwrap(), 0);

    engine.mint(&addr(1), 1).unwrap();
    assert_eq!(delegated(&engine, &addr(2), VOTING), 1);
}

// ---------------------------------------------------------------------------
// 2. Atomicity
// ---------------------------------------------------------------------------

#[test]
fn overdraft_leaves_ledger_untouched_and_notifies_nobody() {
    let engine = engine();
    engine.mint(&addr(1), 3 * SCALE).unwrap();
    engine.delegate(&addr(1), &addr(2)).unwrap();
    let seen = record(&engine);
    let before = engine.save_state().unwrap();

    let err = engine.burn(&addr(1), 3 * SCALE + 1).unwrap_err();
    assert!(matches!(err, GovernanceError::InsufficientBalance { .. }));
    assert_eq!(engine.save_state().unwrap(), before);
    assert!(seen.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// 3. Signed delegation
// ---------------------------------------------------------------------------

#[test]
fn signed_delegation_applies_once() {
    let engine = engine();
    let clock = NullClock::new(1_000);
    let holder = NullSigner::from_seed(11).unwrap();
    let delegatee = addr(0xDD);
    engine.mint(&holder.address(), 9 * SCALE).unwrap();

    let deadline = clock.deadline_in(60);
    let nonce = engine.nonces(&holder.address()).unwrap();
    let sig = holder
        .sign_delegate_by_type(&engine.domain_separator(), &delegatee, VOTING, nonce, deadline)
        .unwrap();

    engine
        .meta_delegate_by_type(&holder.address(), &delegatee, VOTING, deadline, &sig, clock.now())
        .unwrap();
    assert_eq!(engine.nonces(&holder.address()).unwrap(), 1);
    assert_eq!(delegated(&engine, &delegatee, VOTING), 9);

    let replay = engine
        .meta_delegate_by_type(&holder.address(), &delegatee, VOTING, deadline, &sig, clock.now())
        .unwrap_err();
    assert!(matches!(replay, GovernanceError::InvalidSignature));
    assert_eq!(engine.nonces(&holder.address()).unwrap(), 1);
}

#[test]
fn signed_delegation_of_both_dimensions() {
    let engine = engine();
    let clock = NullClock::new(50);
    let holder = NullSigner::from_seed(12).unwrap();
    let delegatee = addr(0xEE);
    let seen = record(&engine);
    let deadline = clock.deadline_in(0);
    let sig = holder
        .sign_delegate(&engine.domain_separator(), &delegatee, 0, deadline)
        .unwrap();

    engine
        .meta_delegate(&holder.address(), &delegatee, deadline, &sig, clock.now())
        .unwrap();

    assert_eq!(
        engine.get_delegates(&holder.address()).unwrap(),
        (Some(delegatee), Some(delegatee))
    );
    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| matches!(
        e,
        GovernanceEvent::DelegateChanged { delegatee: Some(d), .. } if *d == delegatee
    )));
}

#[test]
fn expired_signature_is_rejected_without_consuming_nonce() {
    let engine = engine();
    let clock = NullClock::new(500);
    let holder = NullSigner::from_seed(13).unwrap();
    let deadline = clock.deadline_in(10);
    let sig = holder
        .sign_delegate(&engine.domain_separator(), &addr(2), 0, deadline)
        .unwrap();

    clock.advance(11);
    let err = engine
        .meta_delegate(&holder.address(), &addr(2), deadline, &sig, clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::ExpiredAuthorization { .. }));
    assert_eq!(engine.nonces(&holder.address()).unwrap(), 0);
}

#[test]
fn signature_from_another_holder_is_rejected() {
    let engine = engine();
    let clock = NullClock::new(1);
    let holder = NullSigner::from_seed(14).unwrap();
    let impostor = NullSigner::from_seed(15).unwrap();
    let deadline = clock.deadline_in(100);
    let sig = impostor
        .sign_delegate(&engine.domain_separator(), &addr(2), 0, deadline)
        .unwrap();

    let err = engine
        .meta_delegate(&holder.address(), &addr(2), deadline, &sig, clock.now())
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidSignature));
}

#[test]
fn garbage_signature_is_rejected() {
    let engine = engine();
    let holder = NullSigner::from_seed(16).unwrap();
    let sig = Signature {
        v: 29,
        r: [1; 32],
        s: [2; 32],
    };
    let (deadline, now) = (Timestamp::new(10), Timestamp::new(1));
    let err = engine
        .meta_delegate(&holder.address(), &addr(2), deadline, &sig, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidSignature));
}

#[test]
fn zero_delegator_is_invalid_owner() {
    let engine = engine();
    let sig = Signature {
        v: 27,
        r: [1; 32],
        s: [2; 32],
    };
    let now = Timestamp::new(1);
    let err = engine
        .meta_delegate_by_type(&Address::ZERO, &addr(2), PROPOSITION, now, &sig, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidOwner));
}

#[test]
fn signatures_are_bound_to_the_domain() {
    let holder = NullSigner::from_seed(17).unwrap();
    let now = Timestamp::new(1);
    let mainnet = engine();
    let testnet = GovernanceEngine::new(&EngineConfig {
        chain_id: 5,
        ..EngineConfig::default()
    });
    assert_ne!(mainnet.domain_separator(), testnet.domain_separator());

    let sig = holder
        .sign_delegate(&mainnet.domain_separator(), &addr(2), 0, now)
        .unwrap();
    let err = testnet
        .meta_delegate(&holder.address(), &addr(2), now, &sig, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidSignature));
    mainnet
        .meta_delegate(&holder.address(), &addr(2), now, &sig, now)
        .unwrap();
}

// ---------------------------------------------------------------------------
// 4. Persistence
// ---------------------------------------------------------------------------

#[test]
fn snapshot_file_restores_ledger() {
    let engine = engine();
    let holder = NullSigner::from_seed(18).unwrap();
    engine.mint(&holder.address(), 12 * SCALE).unwrap();
    let now = Timestamp::new(1);
    let sig = holder
        .sign_delegate(&engine.domain_separator(), &addr(3), 0, now)
        .unwrap();
    engine
        .meta_delegate(&holder.address(), &addr(3), now, &sig, now)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.bin");
    std::fs::write(&path, engine.save_state().unwrap()).unwrap();

    let restored =
        GovernanceEngine::load_state(&EngineConfig::default(), &std::fs::read(&path).unwrap())
            .unwrap();
    assert_eq!(restored.nonces(&holder.address()).unwrap(), 1);
    assert_eq!(restored.get_powers_current(&addr(3)).unwrap(), (12 * SCALE, 12 * SCALE));
    assert!(restored.audit().unwrap().is_empty());
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let result = GovernanceEngine::load_state(&EngineConfig::default(), &[0xFF; 3]);
    assert!(matches!(result, Err(GovernanceError::Store(_))));
}
