//! Ports (capability traits) consumed by the key subsystem
//!
//! The core depends on these abstractions, not on a concrete RSA library
//! or random source, so it can run against deterministic fakes in tests.

pub mod contract_tests;
mod entropy;
mod rsa_backend;

pub use entropy::EntropySource;
pub use rsa_backend::{RsaBackend, RsaParams};
