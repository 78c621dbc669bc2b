//! EntropySource trait - capability to produce secure random bytes

use crate::error::KeysResult;

/// Capability to fill buffers with cryptographically secure random bytes
pub trait EntropySource {
    /// Fill `buf` completely
    ///
    /// May block until the underlying source is seeded; there is no timeout.
    ///
    /// # Errors
    ///
    /// Returns `KeysError::Entropy` if the source cannot deliver
    fn fill(&mut self, buf: &mut [u8]) -> KeysResult<()>;
}
