//! Smoke test for the public surface against the real process break:
//! acquire, zeroed_acquire, grow/shrink through resize, then release.

use brkalloc::Heap;

fn main() {
	let heap = Heap::new();

	let a = heap.acquire(48);
	assert!(!a.is_null());
	unsafe { a.write_bytes(0x11, 48) };

	let z = heap.zeroed_acquire(8, 8);
	assert!(!z.is_null());
	unsafe {
		for i in 0..64 {
			assert_eq!(z.add(i).read(), 0);
		}
	}

	let grown = heap.resize(a, 4096);
	assert!(!grown.is_null());
	unsafe {
		for i in 0..48 {
			assert_eq!(grown.add(i).read(), 0x11);
		}
	}

	let shrunk = heap.resize(grown, 16);
	assert!(!shrunk.is_null());
	unsafe {
		for i in 0..16 {
			assert_eq!(shrunk.add(i).read(), 0x11);
		}
	}

	heap.release(shrunk);
	heap.release(z);

	println!("{heap:?}");
	assert!(heap.is_empty());
	println!("resize_demo: acquire/zeroed_acquire/resize/release round-tripped cleanly");
}
