use std::{fmt, marker::PhantomData, mem, mem::MaybeUninit, ptr::NonNull, slice};

use static_assertions::const_assert;

use crate::round_up;

/// Size of the header stored in front of every arena payload.
pub const HEADER_SIZE: usize = mem::size_of::<u64>();

/// Arena payloads are reserved in multiples of this many bytes.
pub const GRANULE: usize = 16;

const_assert!(GRANULE.is_power_of_two());
const_assert!(HEADER_SIZE.is_power_of_two());
const_assert!(GRANULE % HEADER_SIZE == 0);

/// Where a [`Block`] lives, and therefore who must reclaim it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
  /// Carved out of an arena region.
  Arena {
    /// Address of the owning arena's region, used as its identity tag.
    base: usize,
    /// Offset of the payload from the start of the region.
    offset: usize,
  },
  /// Handed out by the general-purpose allocator.
  System,
}

/// A live allocation.
///
/// The handle borrows the allocator that produced it, so it cannot outlive
/// the backing memory. Passing it back to `free` consumes it. A block that is
/// dropped without being freed is leaked: arena space stays reserved until
/// the arena goes away, system memory is never returned.
#[must_use = "dropping a Block leaks it; pass it to `free`"]
pub struct Block<'a> {
  pub(crate) ptr: NonNull<u8>,
  pub(crate) len: usize,
  pub(crate) origin: Origin,
  pub(crate) _marker: PhantomData<&'a ()>,
}

impl<'a> Block<'a> {
  pub(crate) fn new(
    ptr: NonNull<u8>,
    len: usize,
    origin: Origin,
  ) -> Self {
    Self {
      ptr,
      len,
      origin,
      _marker: PhantomData,
    }
  }

  /// Requested size of the payload in bytes.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Bytes actually reserved for the payload.
  ///
  /// Arena blocks reserve the request rounded up to [`GRANULE`]; system
  /// blocks reserve exactly what was asked for.
  pub fn reserved(&self) -> usize {
    match self.origin {
      Origin::Arena { .. } => round_up!(self.len, GRANULE),
      Origin::System => self.len,
    }
  }

  pub fn origin(&self) -> Origin {
    self.origin
  }

  /// Whether the block was served from an arena region.
  pub fn is_arena(&self) -> bool {
    matches!(self.origin, Origin::Arena { .. })
  }

  pub fn as_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  pub fn as_mut_ptr(&mut self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  /// The payload as possibly-uninitialized bytes.
  pub fn as_uninit_mut(&mut self) -> &mut [MaybeUninit<u8>] {
    unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.len) }
  }

  /// Copies `src` into the start of the payload.
  ///
  /// # Panics
  ///
  /// Panics if `src` is longer than the block.
  pub fn write_bytes(
    &mut self,
    src: &[u8],
  ) {
    assert!(src.len() <= self.len, "{} bytes do not fit a {}-byte block", src.len(), self.len);
    unsafe { self.ptr.as_ptr().copy_from_nonoverlapping(src.as_ptr(), src.len()) }
  }

  /// The payload as bytes.
  ///
  /// # Safety
  ///
  /// Every byte of the payload must have been written. Allocation does not
  /// zero memory.
  pub unsafe fn as_slice(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }

  /// The payload as mutable bytes.
  ///
  /// # Safety
  ///
  /// Same as [`Block::as_slice`].
  pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }
}

impl fmt::Debug for Block<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Block")
      .field("ptr", &self.ptr)
      .field("len", &self.len)
      .field("origin", &self.origin)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reserved_depends_on_origin() {
    let mut word = 0u64;
    let ptr = NonNull::from(&mut word).cast::<u8>();

    let arena = Block::new(ptr, 5, Origin::Arena { base: 0, offset: 8 });
    assert_eq!(arena.reserved(), 16);
    assert!(arena.is_arena());

    let system = Block::new(ptr, 5, Origin::System);
    assert_eq!(system.reserved(), 5);
    assert!(!system.is_arena());
  }

  #[test]
  fn write_bytes_then_read() {
    let mut storage = [0u8; 8];
    let ptr = NonNull::new(storage.as_mut_ptr()).unwrap();
    let mut block = Block::new(ptr, 8, Origin::System);

    block.write_bytes(&[1, 2, 3]);

    assert_eq!(unsafe { block.as_slice() }, &[1, 2, 3, 0, 0, 0, 0, 0]);
  }

  #[test]
  #[should_panic]
  fn write_bytes_past_end_panics() {
    let mut storage = [0u8; 4];
    let ptr = NonNull::new(storage.as_mut_ptr()).unwrap();
    let mut block = Block::new(ptr, 4, Origin::System);

    block.write_bytes(&[0; 5]);
  }
}
