#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use quorum_governance::{EngineConfig, GovernanceEngine};
use quorum_types::{Address, GovernancePowerType};

#[derive(Arbitrary, Debug)]
enum Op {
    Mint { to: u8, amount: u64, scaled: bool },
    Burn { from: u8, amount: u64, scaled: bool },
    Transfer { from: u8, to: u8, amount: u64, scaled: bool },
    DelegateByType { caller: u8, to: u8, voting: bool },
    Delegate { caller: u8, to: u8 },
}

fn holder(i: u8) -> Address {
    // Eight holders; index 0 is the zero address.
    match i % 8 {
        0 => Address::ZERO,
        n => Address::new([n; 20]),
    }
}

fn amount(raw: u64, scaled: bool) -> u128 {
    if scaled {
        u128::from(raw % 1_000) * quorum_types::POWER_SCALE_FACTOR
    } else {
        u128::from(raw)
    }
}

// Drive the engine with arbitrary operations. Failed operations must roll
// back, and delegated power must match delegator balances after every step.
fuzz_target!(|ops: Vec<Op>| {
    let engine = GovernanceEngine::new(&EngineConfig::default());
    for op in &ops {
        let _ = match *op {
            Op::Mint { to, amount: a, scaled } => engine.mint(&holder(to), amount(a, scaled)),
            Op::Burn { from, amount: a, scaled } => engine.burn(&holder(from), amount(a, scaled)),
            Op::Transfer { from, to, amount: a, scaled } => {
                engine.transfer(&holder(from), &holder(to), amount(a, scaled))
            }
            Op::DelegateByType { caller, to, voting } => {
                let kind = if voting {
                    GovernancePowerType::Voting
                } else {
                    GovernancePowerType::Proposition
                };
                engine.delegate_by_type(&holder(caller), &holder(to), kind)
            }
            Op::Delegate { caller, to } => engine.delegate(&holder(caller), &holder(to)),
        };
        let found = engine.audit().expect("in-memory audit cannot fail");
        assert!(found.is_empty(), "after {op:?}: {found:?}");
    }
});
