use std::io::Read;

use rlmm::{Allocator, Arena, print_alloc};

/// Waits for ENTER when the demo runs with `--step`.
/// Useful to inspect the process with `pmap` or `gdb` between steps.
fn pause(step: bool) {
  if step {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
  }
}

fn main() -> Result<(), rlmm::LmmError> {
  let step = std::env::args().any(|arg| arg == "--step");

  // A 256-byte region owned by the caller. The arena carves blocks out of it
  // and keeps its own bookkeeping outside the region.
  let mut mem = vec![0u8; 256];
  let arena = Arena::init(Some(&mut mem[..]))?;
  arena.print_usage("start");
  pause(step);

  // --------------------------------------------------------------------
  // 1) Four odd-sized blocks. Each reserves an 8-byte header plus the
  //    request rounded up to 16 bytes; the last one may not fit.
  // --------------------------------------------------------------------
  let mut blocks = Vec::new();
  for (i, size) in [25usize, 16, 128, 31].into_iter().enumerate() {
    let mut block = arena.alloc(size)?;
    block.write_bytes(&vec![i as u8 + 1; size]);
    print_alloc(&format!("1.{}", i), &block);
    blocks.push(block);
  }
  arena.print_usage("after 4 allocs");
  pause(step);

  // --------------------------------------------------------------------
  // 2) Free the first block. It is not the newest, so nothing moves.
  // --------------------------------------------------------------------
  let first = blocks.remove(0);
  arena.free(first);
  arena.print_usage("after freeing the oldest block");
  pause(step);

  // --------------------------------------------------------------------
  // 3) Free the rest newest first; the cursor walks back over each one.
  // --------------------------------------------------------------------
  while let Some(block) = blocks.pop() {
    arena.free(block);
    arena.print_usage("after freeing the newest block");
  }
  pause(step);

  // --------------------------------------------------------------------
  // 4) Grow the newest block in place, then grow past the region and watch
  //    it move to the system allocator.
  // --------------------------------------------------------------------
  let mut block = arena.alloc(32)?;
  block.write_bytes(&[0xab; 32]);
  print_alloc("4.alloc", &block);

  arena.realloc(&mut block, 96)?;
  print_alloc("4.grow in place", &block);

  arena.realloc(&mut block, 4096)?;
  print_alloc("4.relocated", &block);
  println!("[4] first byte after relocation = {:#x}", unsafe { block.as_ptr().read() });
  arena.free(block);
  pause(step);

  // --------------------------------------------------------------------
  // 5) Without an arena every call goes straight to malloc/realloc/free.
  // --------------------------------------------------------------------
  let system = Allocator::System;
  let block = system.alloc(64)?;
  print_alloc("5.system", &block);
  system.free(block);

  println!("\n[6] End of example.");
  Ok(())
}
