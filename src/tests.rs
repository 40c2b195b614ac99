use core::cell::Cell;

use crate::{BreakProvider, Heap, MIN_UNIT};

/// A `BreakProvider` backed by a fixed in-memory buffer instead of the real
/// process break, so tests don't perturb (or depend on) the host process's
/// actual heap.
struct TestBreak {
	buf: Box<[u8]>,
	offset: Cell<usize>,
}

impl TestBreak {
	fn new(capacity: usize) -> Self {
		TestBreak {
			buf: vec![0u8; capacity].into_boxed_slice(),
			offset: Cell::new(0),
		}
	}
}

unsafe impl BreakProvider for TestBreak {
	fn current_break(&self) -> *mut u8 {
		unsafe { self.buf.as_ptr().add(self.offset.get()).cast_mut() }
	}

	fn extend(&self, bytes: usize) -> Option<*mut u8> {
		let start = self.offset.get();
		let end = start.checked_add(bytes)?;
		if end > self.buf.len() {
			return None;
		}
		self.offset.set(end);
		Some(unsafe { self.buf.as_ptr().add(start).cast_mut() })
	}
}

fn heap(capacity: usize) -> Heap<TestBreak> {
	Heap::with_provider(TestBreak::new(capacity))
}

#[test]
fn acquire_zero_bytes_returns_null() {
	let heap = heap(4096);
	assert!(heap.acquire(0).is_null());
}

#[test]
fn acquire_is_aligned_and_writable() {
	let heap = heap(4096);
	let ptr = heap.acquire(37);
	assert!(!ptr.is_null());
	assert_eq!(ptr as usize % MIN_UNIT, 0);

	unsafe {
		for i in 0..37 {
			ptr.add(i).write(i as u8);
		}
		for i in 0..37 {
			assert_eq!(ptr.add(i).read(), i as u8);
		}
	}
	heap.release(ptr);
}

#[test]
fn zeroed_acquire_zeroes_the_whole_aligned_payload() {
	let heap = heap(4096);
	let ptr = heap.zeroed_acquire(10, 3);
	assert!(!ptr.is_null());
	unsafe {
		for i in 0..30 {
			assert_eq!(ptr.add(i).read(), 0);
		}
	}
	heap.release(ptr);
}

#[test]
fn zeroed_acquire_rejects_overflowing_count() {
	let heap = heap(4096);
	assert!(heap.zeroed_acquire(usize::MAX, 2).is_null());
}

#[test]
fn zeroed_acquire_rejects_zero_arguments() {
	let heap = heap(4096);
	assert!(heap.zeroed_acquire(0, 8).is_null());
	assert!(heap.zeroed_acquire(8, 0).is_null());
}

#[test]
fn resize_to_same_size_is_a_no_op() {
	let heap = heap(4096);
	let ptr = heap.acquire(64);
	let resized = heap.resize(ptr, 64);
	assert_eq!(ptr, resized);
	heap.release(resized);
}

#[test]
fn resize_to_zero_releases_and_returns_null() {
	let heap = heap(4096);
	let ptr = heap.acquire(64);
	assert!(heap.resize(ptr, 0).is_null());
	assert!(heap.is_empty());
}

#[test]
fn resize_of_null_acts_like_acquire() {
	let heap = heap(4096);
	let ptr = heap.resize(core::ptr::null_mut(), 64);
	assert!(!ptr.is_null());
	heap.release(ptr);
}

#[test]
fn release_of_unknown_pointer_is_ignored() {
	let heap = heap(4096);
	let mut bystander = 0u8;
	heap.release(&mut bystander as *mut u8);
	assert!(heap.is_empty());
}

#[test]
fn double_release_is_ignored_and_heap_stays_usable() {
	let heap = heap(4096);
	let ptr = heap.acquire(64);
	heap.release(ptr);
	heap.release(ptr);

	let next = heap.acquire(64);
	assert!(!next.is_null());
	heap.release(next);
}

#[test]
fn split_leaves_a_reusable_remainder() {
	let heap = heap(4096);
	let a = heap.acquire(32);
	let b = heap.acquire(32);
	assert!(!a.is_null() && !b.is_null());
	assert_ne!(a, b);
	assert!(!heap.is_oom());
	heap.release(a);
	heap.release(b);
}

#[test]
fn releasing_a_middle_chunk_coalesces_both_neighbors() {
	let heap = heap(4096);
	let a = heap.acquire(32);
	let b = heap.acquire(32);
	let c = heap.acquire(32);

	heap.release(a);
	heap.release(c);
	assert!(!heap.is_empty());

	heap.release(b);
	assert!(heap.is_empty());
}

#[test]
fn expand_forward_absorbs_a_free_neighbor_in_place() {
	let heap = heap(4096);
	// Chosen so that `a`'s payload, the header between them, and `b`'s
	// payload sum to exactly the post-expand size, hitting the "forward
	// absorb, exact" case rather than a split.
	let a = heap.acquire(32);
	let b = heap.acquire(64);
	let exact_total = 32 + crate::align::header_footprint() + 64;
	heap.release(b);

	unsafe {
		for i in 0..32 {
			a.add(i).write(0xAB);
		}
	}

	let grown = heap.resize(a, exact_total);
	assert_eq!(grown, a, "expand should grow in place, absorbing the free neighbor");
	unsafe {
		for i in 0..32 {
			assert_eq!(grown.add(i).read(), 0xAB);
		}
	}
	heap.release(grown);
}

#[test]
fn expand_backward_absorbs_a_free_predecessor() {
	let heap = heap(4096);
	let a = heap.acquire(64);
	let b = heap.acquire(32);
	let exact_total = 64 + crate::align::header_footprint() + 32;
	heap.release(a);

	unsafe {
		for i in 0..32 {
			b.add(i).write(0xCD);
		}
	}

	let grown = heap.resize(b, exact_total);
	assert_eq!(grown, a, "backward absorb should relocate the payload to the predecessor's address");
	unsafe {
		for i in 0..32 {
			assert_eq!(grown.add(i).read(), 0xCD);
		}
	}
	heap.release(grown);
}

#[test]
fn shrink_splits_off_a_free_remainder_that_later_acquires_reuse() {
	// A tight buffer: if the split's remainder weren't reused, the second
	// acquire below would have to call into the break provider again and
	// this capacity would refuse it.
	let heap = heap(512);
	let big = heap.acquire(256);
	assert!(!big.is_null());

	let shrunk = heap.resize(big, MIN_UNIT);
	assert_eq!(shrunk, big);

	let reused = heap.acquire(MIN_UNIT);
	assert!(!reused.is_null());
	assert!(!heap.is_oom());

	heap.release(shrunk);
	heap.release(reused);
}

#[test]
fn stress_acquire_release_cycle_leaves_heap_empty() {
	const PTRS_TO_MAKE: usize = 330;
	let heap = heap(1 << 20);
	let mut ptrs = Vec::with_capacity(PTRS_TO_MAKE);

	for i in 0..PTRS_TO_MAKE {
		let size = MIN_UNIT * (1 + i % 7);
		let ptr = heap.acquire(size);
		assert!(!ptr.is_null(), "acquire failed at iteration {i}");
		unsafe { ptr.write(i as u8) };
		ptrs.push(ptr);
	}

	// Release in an order that mixes adjacent and scattered chunks, the way
	// a real workload's free pattern would.
	for ptr in ptrs.iter().step_by(2) {
		heap.release(*ptr);
	}
	for ptr in ptrs.iter().skip(1).step_by(2) {
		heap.release(*ptr);
	}

	assert!(heap.is_empty());
	assert!(!heap.is_oom());
}

#[test]
fn out_of_memory_reports_null_without_panicking() {
	let heap = heap(MIN_UNIT * 4);
	let huge = heap.acquire(1 << 30);
	assert!(huge.is_null());
	assert!(heap.is_oom());
}
