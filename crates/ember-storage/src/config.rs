//! Storage configuration parameters.

use crate::error::StorageError;

/// Configuration for particle storage.
///
/// Controls the capacity of every block a container creates.
/// Validated when the particle state is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Number of particle slots in each block.
    ///
    /// Default: 1000. Must be at least 1.
    pub block_size: usize,
}

impl StorageConfig {
    /// Default block capacity in particles.
    pub const DEFAULT_BLOCK_SIZE: usize = 1000;

    /// Create a config with the given block size.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.block_size == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "block_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}
