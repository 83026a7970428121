//! Error type shared by every allocation path.

/// Errors reported by arena and system allocations.
///
/// The arena's own bump path never fails; it falls back to the system
/// allocator instead, so `OutOfMemory` always means that fallback failed.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LmmError {
  /// The general-purpose allocator could not satisfy a request.
  #[error("system allocator could not provide {requested} bytes")]
  OutOfMemory {
    /// Number of bytes requested.
    requested: usize,
  },

  /// An [`ArenaConfig`](crate::ArenaConfig) that cannot produce a usable region.
  #[error("invalid arena config: {reason}")]
  InvalidConfig {
    /// What was wrong with the config.
    reason: String,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn out_of_memory_message_names_size() {
    let err = LmmError::OutOfMemory { requested: 4096 };
    assert_eq!(err.to_string(), "system allocator could not provide 4096 bytes");
  }
}
