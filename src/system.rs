//! Pass-through to the host's general-purpose allocator.

use std::ptr::NonNull;

use libc::c_void;

use crate::error::LmmError;

/// Allocates `size` uninitialized bytes with `malloc(3)`.
///
/// Zero-byte requests are bumped to one byte so a successful call always
/// yields a unique, freeable pointer.
pub fn allocate_raw(size: usize) -> Result<NonNull<u8>, LmmError> {
  let address = unsafe { libc::malloc(size.max(1)) };
  NonNull::new(address as *mut u8).ok_or(LmmError::OutOfMemory { requested: size })
}

/// Resizes an allocation obtained from [`allocate_raw`] with `realloc(3)`.
///
/// On failure the original allocation is left untouched and still owned by
/// the caller.
///
/// # Safety
///
/// `address` must come from [`allocate_raw`] or [`reallocate_raw`] and must not
/// have been freed.
pub unsafe fn reallocate_raw(
  address: NonNull<u8>,
  size: usize,
) -> Result<NonNull<u8>, LmmError> {
  let address = unsafe { libc::realloc(address.as_ptr() as *mut c_void, size.max(1)) };
  NonNull::new(address as *mut u8).ok_or(LmmError::OutOfMemory { requested: size })
}

/// Releases an allocation with `free(3)`.
///
/// # Safety
///
/// `address` must come from [`allocate_raw`] or [`reallocate_raw`] and must not
/// have been freed.
pub unsafe fn free_raw(address: NonNull<u8>) {
  unsafe { libc::free(address.as_ptr() as *mut c_void) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allocate_write_grow_free() {
    unsafe {
      let address = allocate_raw(64).unwrap();
      for i in 0..64 {
        address.as_ptr().add(i).write(i as u8);
      }

      let grown = reallocate_raw(address, 256).unwrap();
      for i in 0..64 {
        assert_eq!(grown.as_ptr().add(i).read(), i as u8);
      }

      free_raw(grown);
    }
  }

  #[test]
  fn zero_sized_request_is_freeable() {
    unsafe {
      let address = allocate_raw(0).unwrap();
      free_raw(address);
    }
  }

  #[test]
  fn impossible_request_reports_out_of_memory() {
    assert_eq!(
      allocate_raw(usize::MAX),
      Err(LmmError::OutOfMemory { requested: usize::MAX })
    );
  }
}
