//! Nullable infrastructure for deterministic testing.
//!
//! The engine takes "now" and signatures as inputs instead of reading a
//! system clock or talking to a wallet. This crate provides test-friendly
//! stand-ins for both:
//! - a clock that only moves when told to
//! - a signer with a fixed, seed-derived key that signs delegation requests
//!
//! Usage: drive the engine with these in tests and benches.

pub mod clock;
pub mod signer;

pub use clock::NullClock;
pub use signer::NullSigner;
