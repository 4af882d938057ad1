//! Allocation-tracking harness: every construction and release cycle
//! must leave zero net live heap allocations. This file holds a single
//! test so nothing else races the counter.

use std::alloc::GlobalAlloc;
use std::alloc::Layout;
use std::alloc::System;
use std::sync::atomic::AtomicIsize;
use std::sync::atomic::Ordering;

use xstr::CompactString;
use xstr::Tokenizer;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);

struct CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { System.alloc(layout) };
    if !ptr.is_null() {
      LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::SeqCst);
    }
    ptr
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::SeqCst);
    unsafe { System.dealloc(ptr, layout) }
  }

  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    let new = unsafe { System.realloc(ptr, layout, new_size) };
    if !new.is_null() {
      LIVE_BYTES
        .fetch_add(new_size as isize - layout.size() as isize, Ordering::SeqCst);
    }
    new
  }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc;

#[test]
fn operations_balance_every_allocation() {
  let before = LIVE_BYTES.load(Ordering::SeqCst);
  {
    // inline values never allocate
    let mut inline = CompactString::from_bytes(b"inline only").unwrap();
    inline.trim(b" ");
    inline.release();

    // heap construction, growth, copy, concat, trim, tokenize
    let mut s = CompactString::from_bytes(&[b'x'; 64]).unwrap();
    s.grow(200).unwrap();

    let mut copy = CompactString::new();
    copy.assign(&s).unwrap();

    let wrap = CompactString::from_bytes(b"<<").unwrap();
    s.concat(&wrap, &wrap).unwrap();
    s.trim(b"<x");
    assert!(s.is_empty());

    let mut tokens = Tokenizer::new(&mut copy, b"x");
    while let Some(token) = tokens.next_token().unwrap() {
      drop(token);
    }

    // explicit release and implicit drop both free exactly once
    s.release();
    s.release();
  }
  let after = LIVE_BYTES.load(Ordering::SeqCst);
  assert_eq!(before, after, "net heap usage must return to the baseline");
}
