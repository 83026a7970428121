//! Arena sizing parameters.

use crate::error::LmmError;
use crate::{GRANULE, HEADER_SIZE};

/// Configuration for [`Arena`](crate::Arena) initialization.
///
/// Decides when a caller-supplied region is large enough to be used, and
/// how much memory the arena acquires for itself otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
  /// A caller-supplied region must be strictly longer than this to be used.
  ///
  /// Default: 128 bytes.
  pub min_base_size: usize,

  /// Size of the backing buffer the arena acquires when it cannot use the
  /// caller's region.
  ///
  /// Default: 1024 bytes.
  pub default_base_size: usize,
}

impl ArenaConfig {
  /// Default minimum usable caller region, in bytes.
  pub const MIN_BASE_SIZE: usize = 128;

  /// Default self-acquired backing size, in bytes.
  pub const DEFAULT_BASE_SIZE: usize = 1024;

  /// Create a config with the default thresholds.
  pub const fn new() -> Self {
    Self {
      min_base_size: Self::MIN_BASE_SIZE,
      default_base_size: Self::DEFAULT_BASE_SIZE,
    }
  }

  /// Override the self-acquired backing size.
  pub fn with_default_base_size(
    mut self,
    size: usize,
  ) -> Self {
    self.default_base_size = size;
    self
  }

  /// Override the minimum usable caller region.
  pub fn with_min_base_size(
    mut self,
    size: usize,
  ) -> Self {
    self.min_base_size = size;
    self
  }

  /// Check that an arena built from this config can hold at least one block.
  pub fn validate(&self) -> Result<(), LmmError> {
    // Worst case lead-in to reach header alignment is HEADER_SIZE - 1 bytes.
    let smallest = HEADER_SIZE - 1 + HEADER_SIZE + GRANULE;

    if self.default_base_size <= smallest {
      return Err(LmmError::InvalidConfig {
        reason: format!(
          "default_base_size {} cannot hold a single {}-byte block",
          self.default_base_size, GRANULE
        ),
      });
    }

    if self.min_base_size < smallest {
      return Err(LmmError::InvalidConfig {
        reason: format!(
          "min_base_size {} is below the smallest usable region of {} bytes",
          self.min_base_size, smallest
        ),
      });
    }

    Ok(())
  }
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_constants() {
    let config = ArenaConfig::default();
    assert_eq!(config.min_base_size, 128);
    assert_eq!(config.default_base_size, 1024);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn tiny_default_base_size_is_rejected() {
    let config = ArenaConfig::new().with_default_base_size(16);
    assert!(matches!(
      config.validate(),
      Err(LmmError::InvalidConfig { .. })
    ));
  }

  #[test]
  fn tiny_min_base_size_is_rejected() {
    let config = ArenaConfig::new().with_min_base_size(0);
    assert!(config.validate().is_err());
  }
}
