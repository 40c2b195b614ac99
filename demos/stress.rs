//! Re-enactment of the original C test driver's 330-pointer acquire/release
//! loop, now against the real process break.

use brkalloc::Heap;

const PTRS_TO_MAKE: usize = 330;

fn main() {
	let heap = Heap::new();
	let mut ptrs = Vec::with_capacity(PTRS_TO_MAKE);

	for i in 0..PTRS_TO_MAKE {
		let size = 16 * (1 + i % 23);
		let ptr = heap.acquire(size);
		assert!(!ptr.is_null(), "acquire failed at iteration {i} (size {size})");
		unsafe { ptr.write_bytes((i % 256) as u8, size) };
		ptrs.push((ptr, size));
	}

	for &(ptr, size) in &ptrs {
		let byte = unsafe { ptr.read() };
		assert_eq!(byte as usize % 256, byte as usize, "corrupted chunk of size {size}");
	}

	for (ptr, _) in ptrs.drain(..) {
		heap.release(ptr);
	}

	println!("{heap:?}");
	assert!(heap.is_empty(), "heap should be fully reclaimed after releasing every pointer");
	println!("stress: acquired and released {PTRS_TO_MAKE} chunks without corruption");
}
