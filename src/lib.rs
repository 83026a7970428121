//! # rlmm - Local Memory Manager
//!
//! This crate provides a region-based **bump allocator** that serves
//! allocations out of one contiguous block of memory, either supplied by the
//! caller or acquired by the arena itself, and falls back to the system
//! allocator (`malloc(3)`) whenever the region cannot help.
//!
//! ## Overview
//!
//! ```text
//!   Arena Region:
//!
//!   ┌──────┬──────────┬──────┬──────────────┬──────┬──────┬───────────────┐
//!   │ hdr  │    A     │ hdr  │      B       │ hdr  │  C   │  Free Space   │
//!   └──────┴──────────┴──────┴──────────────┴──────┴──────┴───────────────┘
//!                                                         ▲               ▲
//!                                                         │               │
//!                                                      Cursor           Limit
//!                                                    (next alloc)
//!
//!   Each allocation writes an 8-byte size header and bumps the cursor past
//!   the payload, rounded up to 16 bytes. Fast allocation: O(1).
//! ```
//!
//! Freeing `C` moves the cursor back over it. Freeing `A` or `B` while `C`
//! is live does nothing: only the newest block can be reclaimed, so space is
//! recovered when blocks are freed in reverse order of allocation.
//!
//! ## Crate Structure
//!
//! ```text
//!   rlmm
//!   ├── align      - Rounding macros (round_up!, cut_down!)
//!   ├── allocator  - Allocator: explicit arena-or-system mode
//!   ├── block      - Block handle and its Origin tag
//!   ├── bump       - Arena implementation
//!   ├── config     - ArenaConfig sizing thresholds
//!   ├── error      - LmmError
//!   └── system     - malloc/realloc/free pass-through
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rlmm::Allocator;
//!
//! let mut mem = vec![0u8; 4096];
//! let allocator = Allocator::arena(Some(&mut mem[..])).unwrap();
//!
//! let mut block = allocator.alloc(64).unwrap();
//! block.write_bytes(b"hello");
//!
//! allocator.realloc(&mut block, 128).unwrap();
//! assert_eq!(unsafe { &block.as_slice()[..5] }, b"hello");
//!
//! allocator.free(block);
//! ```
//!
//! Requests that do not fit are served by the system allocator and tagged
//! [`Origin::System`]; hand them back to the same allocator and they are
//! released with `free(3)`.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: an [`Arena`] is `!Sync`; use one per thread
//! - **LIFO reclamation**: freeing a block that is not the newest is a no-op
//! - **No coalescing or defragmentation**
//! - **Unix-only**: requires `libc` for the system allocator
//!
//! ## Safety
//!
//! Blocks borrow the allocator that produced them, so they cannot outlive
//! their backing memory, and arena teardown happens exactly once in `Drop`.
//! Payload memory is never zeroed; reading it as `&[u8]` is `unsafe` until
//! every byte has been written.

pub mod align;
mod allocator;
mod block;
mod bump;
mod config;
mod error;
pub mod system;

pub use allocator::Allocator;
pub use block::{Block, GRANULE, HEADER_SIZE, Origin};
pub use bump::{Arena, print_alloc};
pub use config::ArenaConfig;
pub use error::LmmError;
