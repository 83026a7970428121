//! Arena-or-system allocation front end.

use crate::{
  block::{Block, Origin},
  bump::Arena,
  config::ArenaConfig,
  error::LmmError,
  system,
};

/// Where allocations are served from.
///
/// `System` passes every call straight to the general-purpose allocator, so
/// code written against `Allocator` behaves the same, if slower, when no
/// arena is configured.
pub enum Allocator<'a> {
  Arena(Arena<'a>),
  System,
}

impl<'a> Allocator<'a> {
  /// An allocator backed by an arena over `base`, see [`Arena::init`].
  pub fn arena(base: Option<&'a mut [u8]>) -> Result<Self, LmmError> {
    Ok(Self::Arena(Arena::init(base)?))
  }

  pub fn arena_with_config(
    base: Option<&'a mut [u8]>,
    config: &ArenaConfig,
  ) -> Result<Self, LmmError> {
    Ok(Self::Arena(Arena::with_config(base, config)?))
  }

  pub fn as_arena(&self) -> Option<&Arena<'a>> {
    match self {
      Self::Arena(arena) => Some(arena),
      Self::System => None,
    }
  }

  pub fn alloc(
    &self,
    size: usize,
  ) -> Result<Block<'_>, LmmError> {
    match self {
      Self::Arena(arena) => arena.alloc(size),
      Self::System => Arena::alloc_system(size),
    }
  }

  pub fn realloc(
    &self,
    block: &mut Block<'_>,
    new_size: usize,
  ) -> Result<(), LmmError> {
    match (self, block.origin) {
      (Self::Arena(arena), _) => arena.realloc(block, new_size),
      (Self::System, Origin::System) => {
        block.ptr = unsafe { system::reallocate_raw(block.ptr, new_size)? };
        block.len = new_size;
        Ok(())
      }
      (Self::System, Origin::Arena { .. }) => {
        debug_assert!(false, "arena block {:?} passed to the system allocator", block);
        let len = block.len;
        Arena::relocate(block, len, new_size)
      }
    }
  }

  pub fn free(
    &self,
    block: Block<'_>,
  ) {
    match (self, block.origin) {
      (Self::Arena(arena), _) => arena.free(block),
      (Self::System, Origin::System) => unsafe { system::free_raw(block.ptr) },
      (Self::System, Origin::Arena { .. }) => {
        debug_assert!(false, "arena block {:?} passed to the system allocator", block);
      }
    }
  }
}

impl<'a> From<Arena<'a>> for Allocator<'a> {
  fn from(arena: Arena<'a>) -> Self {
    Self::Arena(arena)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DEFAULT_SIZE: usize = 256;

  #[test]
  fn transparent() {
    let allocator = Allocator::System;

    let mut arr = allocator.alloc(DEFAULT_SIZE).unwrap();
    assert_eq!(arr.origin(), Origin::System);

    let pattern: Vec<u8> = (0..DEFAULT_SIZE).map(|i| (i & 0xff) as u8).collect();
    arr.write_bytes(&pattern);

    allocator.realloc(&mut arr, 2 * DEFAULT_SIZE).unwrap();

    assert_eq!(arr.len(), 2 * DEFAULT_SIZE);
    assert_eq!(unsafe { &arr.as_slice()[..DEFAULT_SIZE] }, pattern.as_slice());

    allocator.free(arr);
  }

  #[test]
  fn arena_mode_serves_from_region() {
    let mut mem = vec![0u8; DEFAULT_SIZE];
    let range = mem.as_ptr_range();
    let (low, high) = (range.start as usize, range.end as usize);
    let allocator = Allocator::arena(Some(&mut mem[..])).unwrap();

    let block = allocator.alloc(25).unwrap();
    let address = block.as_ptr() as usize;
    assert!(block.is_arena());
    assert!(address > low && address < high);

    assert_eq!(allocator.as_arena().map(Arena::used), Some(8 + 32));
    allocator.free(block);
    assert_eq!(allocator.as_arena().map(Arena::used), Some(0));
  }

  #[test]
  fn system_mode_has_no_arena() {
    assert!(Allocator::System.as_arena().is_none());
  }

  #[test]
  fn from_arena() {
    let allocator: Allocator<'_> = Arena::init(None).unwrap().into();
    let block = allocator.alloc(1).unwrap();
    assert!(block.is_arena());
    allocator.free(block);
  }

  #[test]
  fn system_mode_reports_out_of_memory() {
    let allocator = Allocator::System;
    assert!(matches!(
      allocator.alloc(usize::MAX),
      Err(LmmError::OutOfMemory { .. })
    ));
  }
}
