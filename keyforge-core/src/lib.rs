#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Derivation engine for KeyForge.
//!
//! Turns a single master phrase into a reproducible hierarchy of technical
//! accounts (checksummed addresses) and per-validator session keys (sr25519
//! and ed25519), so an operator can regenerate the exact same secrets from
//! one phrase instead of storing many secrets independently.
//!
//! The engine is pure and deterministic: the same (phrase, label) pair
//! always yields the same seed, and the same seed always yields the same
//! public identifier. Session keys are derived in-process by default; an
//! external `subkey`-compatible binary can be plugged in behind the same
//! interface for parity checks.

mod address;
pub use address::*;

mod batch;
pub use batch::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod hdkd;
pub use hdkd::*;

mod path;
pub use path::*;

mod phrase;
pub use phrase::*;

mod seed;
pub use seed::*;

mod session;
pub use session::*;

mod subkey;
pub use subkey::*;
