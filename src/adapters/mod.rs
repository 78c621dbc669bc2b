//! Adapters - concrete implementations of ports (traits)

mod os_entropy;
mod rustcrypto;

#[cfg(test)]
pub mod fake_backend;

// Re-export for convenience
pub use os_entropy::OsEntropy;
pub use rustcrypto::RustCryptoBackend;
