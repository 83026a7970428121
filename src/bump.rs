use std::{cell::Cell, marker::PhantomData, ptr::NonNull};

use crate::{
  align::checked_round_up,
  block::{Block, GRANULE, HEADER_SIZE, Origin},
  config::ArenaConfig,
  cut_down,
  error::LmmError,
  system,
};

pub fn print_alloc(
  label: &str,
  block: &Block<'_>,
) {
  match block.origin() {
    Origin::Arena { offset, .. } => println!(
      "[{}] {} bytes from arena, address = {:?}, offset = {}, reserved = {}",
      label,
      block.len(),
      block.as_ptr(),
      offset,
      block.reserved()
    ),
    Origin::System => println!(
      "[{}] {} bytes from system allocator, address = {:?}",
      label,
      block.len(),
      block.as_ptr()
    ),
  }
}

/// A bump arena over one contiguous region.
///
/// Every block is an 8-byte size header followed by the payload, rounded up
/// to [`GRANULE`] bytes. Only the block at the cursor edge can be reclaimed;
/// freeing any other block is a no-op and its space stays reserved until
/// every block allocated after it has been freed, newest first.
///
/// Requests the region cannot hold are served by the system allocator and
/// come back as [`Origin::System`] blocks.
pub struct Arena<'a> {
  base: NonNull<u8>,
  start: usize,
  cursor: Cell<usize>,
  limit: usize,
  owns_backing_memory: bool,
  _region: PhantomData<&'a mut [u8]>,
}

// SAFETY: the region is either an exclusive borrow or memory the arena owns.
// `Cell` keeps the arena `!Sync`, so it is never used from two threads at once.
unsafe impl Send for Arena<'_> {}

impl<'a> Arena<'a> {
  /// Creates an arena with the default [`ArenaConfig`].
  ///
  /// A caller region longer than [`ArenaConfig::MIN_BASE_SIZE`] is used in
  /// place. Anything else makes the arena acquire
  /// [`ArenaConfig::DEFAULT_BASE_SIZE`] bytes of its own, released on drop.
  pub fn init(base: Option<&'a mut [u8]>) -> Result<Self, LmmError> {
    Self::with_config(base, &ArenaConfig::default())
  }

  pub fn with_config(
    base: Option<&'a mut [u8]>,
    config: &ArenaConfig,
  ) -> Result<Self, LmmError> {
    config.validate()?;

    match base {
      Some(region) if region.len() > config.min_base_size => {
        let len = region.len();
        Ok(Self::from_raw(NonNull::from(region).cast(), len, false))
      }
      _ => {
        let size = config.default_base_size;
        let address = system::allocate_raw(size)?;
        Ok(Self::from_raw(address, size, true))
      }
    }
  }

  fn from_raw(
    base: NonNull<u8>,
    len: usize,
    owns_backing_memory: bool,
  ) -> Self {
    // Headers sit on 8-byte boundaries so payloads are 8-byte aligned.
    let start = base.as_ptr().align_offset(HEADER_SIZE).min(len);
    let limit = start + cut_down!(len - start, GRANULE);

    Self {
      base,
      start,
      cursor: Cell::new(start),
      limit,
      owns_backing_memory,
      _region: PhantomData,
    }
  }

  pub fn owns_backing_memory(&self) -> bool {
    self.owns_backing_memory
  }

  /// Usable bytes in the region, headers included.
  pub fn capacity(&self) -> usize {
    self.limit - self.start
  }

  /// Bytes currently reserved, headers included.
  pub fn used(&self) -> usize {
    self.cursor.get() - self.start
  }

  pub fn remaining(&self) -> usize {
    self.limit - self.cursor.get()
  }

  /// Whether `block` is the newest live arena block, the only one `free`
  /// can reclaim.
  pub fn is_top(
    &self,
    block: &Block<'_>,
  ) -> bool {
    self
      .payload_offset(block)
      .is_some_and(|offset| offset + self.header(offset) == self.cursor.get())
  }

  pub fn print_usage(
    &self,
    label: &str,
  ) {
    println!(
      "[{}] arena at {:?}: used = {}, remaining = {}, capacity = {}, owned = {}",
      label,
      self.base,
      self.used(),
      self.remaining(),
      self.capacity(),
      self.owns_backing_memory
    );
  }

  /// Allocates `size` uninitialized bytes.
  ///
  /// O(1) bump from the region when it fits, the system allocator otherwise.
  /// Fails only if that fallback fails.
  pub fn alloc(
    &self,
    size: usize,
  ) -> Result<Block<'_>, LmmError> {
    let header = self.cursor.get();

    match self.fit(header, size) {
      Some(end) => Ok(self.reserve(header, end, size)),
      None => Self::alloc_system(size),
    }
  }

  /// Resizes `block` to `new_size` bytes, preserving its contents up to the
  /// smaller of the two sizes.
  ///
  /// The newest arena block grows or shrinks in place when the region allows
  /// it. Any other arena block is copied into a system allocation and its old
  /// space is abandoned. On error `block` is left untouched.
  pub fn realloc(
    &self,
    block: &mut Block<'_>,
    new_size: usize,
  ) -> Result<(), LmmError> {
    if let Origin::System = block.origin {
      let address = unsafe { system::reallocate_raw(block.ptr, new_size)? };
      block.ptr = address;
      block.len = new_size;
      return Ok(());
    }

    let Some(offset) = self.payload_offset(block) else {
      debug_assert!(false, "block {:?} belongs to another arena", block);
      let len = block.len;
      return Self::relocate(block, len, new_size);
    };

    let reserved = self.header(offset);
    let header = offset - HEADER_SIZE;
    let is_top = offset + reserved == self.cursor.get();

    let in_place = if is_top { self.fit(header, new_size) } else { None };

    if let Some(end) = in_place {
      self.write_header(header, end - offset);
      self.cursor.set(end);
      block.len = new_size;
      return Ok(());
    }

    Self::relocate(block, reserved, new_size)?;

    // A top block that could not grow in place is reclaimed like `free`.
    if is_top {
      self.cursor.set(header);
    }

    Ok(())
  }

  /// Releases `block`.
  ///
  /// System blocks go back to the system allocator. The newest arena block
  /// retracts the cursor; any other arena block is left in place.
  pub fn free(
    &self,
    block: Block<'_>,
  ) {
    if let Origin::System = block.origin {
      unsafe { system::free_raw(block.ptr) };
      return;
    }

    let Some(offset) = self.payload_offset(&block) else {
      debug_assert!(false, "block {:?} belongs to another arena", block);
      return;
    };

    if offset + self.header(offset) == self.cursor.get() {
      self.cursor.set(offset - HEADER_SIZE);
    }
  }

  pub(crate) fn alloc_system<'b>(size: usize) -> Result<Block<'b>, LmmError> {
    let address = system::allocate_raw(size)?;
    Ok(Block::new(address, size, Origin::System))
  }

  /// Moves `block` into a fresh system allocation of `new_size` bytes,
  /// carrying over at most `keep` bytes.
  pub(crate) fn relocate(
    block: &mut Block<'_>,
    keep: usize,
    new_size: usize,
  ) -> Result<(), LmmError> {
    let address = system::allocate_raw(new_size)?;

    unsafe {
      address
        .as_ptr()
        .copy_from_nonoverlapping(block.ptr.as_ptr(), keep.min(new_size));
    }

    block.ptr = address;
    block.len = new_size;
    block.origin = Origin::System;
    Ok(())
  }

  /// End offset of a block whose header sits at `header`, if the block fits
  /// strictly below the limit.
  fn fit(
    &self,
    header: usize,
    size: usize,
  ) -> Option<usize> {
    let rounded = checked_round_up(size, GRANULE)?;
    let end = header.checked_add(HEADER_SIZE)?.checked_add(rounded)?;
    (end < self.limit).then_some(end)
  }

  fn reserve(
    &self,
    header: usize,
    end: usize,
    size: usize,
  ) -> Block<'_> {
    let offset = header + HEADER_SIZE;
    self.write_header(header, end - offset);
    self.cursor.set(end);

    let address = unsafe { self.base.add(offset) };
    Block::new(
      address,
      size,
      Origin::Arena {
        base: self.base.as_ptr() as usize,
        offset,
      },
    )
  }

  /// Payload offset of `block` if this arena handed it out.
  fn payload_offset(
    &self,
    block: &Block<'_>,
  ) -> Option<usize> {
    match block.origin {
      Origin::Arena { base, offset }
        if base == self.base.as_ptr() as usize
          && offset >= self.start + HEADER_SIZE
          && offset <= self.cursor.get() =>
      {
        Some(offset)
      }
      _ => None,
    }
  }

  fn header(
    &self,
    offset: usize,
  ) -> usize {
    debug_assert!(offset >= self.start + HEADER_SIZE && offset <= self.limit);
    unsafe {
      self
        .base
        .add(offset - HEADER_SIZE)
        .cast::<u64>()
        .read_unaligned() as usize
    }
  }

  fn write_header(
    &self,
    header: usize,
    reserved: usize,
  ) {
    debug_assert!(header >= self.start && header + HEADER_SIZE <= self.limit);
    unsafe {
      self
        .base
        .add(header)
        .cast::<u64>()
        .write_unaligned(reserved as u64);
    }
  }
}

impl Drop for Arena<'_> {
  fn drop(&mut self) {
    if self.owns_backing_memory {
      unsafe { system::free_raw(self.base) };
    }
  }
}
