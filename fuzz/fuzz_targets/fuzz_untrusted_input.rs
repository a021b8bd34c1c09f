#![no_main]

use libfuzzer_sys::fuzz_target;

use quorum_governance::{EngineConfig, GovernanceEngine};
use quorum_types::Signature;

// Snapshot files and signatures arrive from outside; neither may panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(engine) = GovernanceEngine::load_state(&EngineConfig::default(), data) {
        let _ = engine.audit();
    }

    if data.len() >= 97 {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&data[..32]);
        if let Ok(sig) = Signature::from_bytes(&data[32..97]) {
            let _ = quorum_crypto::recover_signer(&digest, &sig);
        }
    }
});
