use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::KeysResult;
use crate::ports::EntropySource;

/// Entropy from the operating system's secure random number generator
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> KeysResult<()> {
        OsRng.try_fill_bytes(buf)?;
        Ok(())
    }
}
