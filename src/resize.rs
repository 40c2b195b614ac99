use core::ptr::{self, NonNull};

use crate::align::header_footprint;
use crate::config::MIN_FREE_CHUNK;
use crate::grower::BreakProvider;
use crate::header::{Header, Status};
use crate::list::divide;
use crate::Heap;

/// Relocates `next`'s header so that `header`'s payload grows to exactly `s`
/// bytes and the leftover becomes a new, shorter FREE chunk right after it.
/// Used when `header`+`next` together have more than `s` bytes to give but
/// not exactly `s` (the "forward absorb, split" case).
unsafe fn forward_absorb_split(mut header: NonNull<Header>, next: NonNull<Header>, s: usize) {
	unsafe {
		let footprint = header_footprint();
		let total_payload = header.as_ref().payload_size + footprint + next.as_ref().payload_size;
		let new_addr = Header::payload_start(header).as_ptr().add(s);

		// Overlap-tolerant: `new_addr` always falls strictly before `next`'s
		// current address, since we're claiming some of its former span.
		ptr::copy(next.as_ptr().cast::<u8>(), new_addr, footprint);

		let mut moved = NonNull::new_unchecked(new_addr.cast::<Header>());
		moved.as_mut().payload_size = total_payload - s - footprint;
		if let Some(mut after) = moved.as_ref().next {
			after.as_mut().prev = Some(moved);
		}

		header.as_mut().next = Some(moved);
		header.as_mut().payload_size = s;
	}
}

/// Absorbs `header` entirely into `prev` (which must be FREE and exactly
/// large enough together with `header` to cover `s`), copying `header`'s
/// live payload to the front of `prev`'s span. Returns the resulting
/// payload address (`prev`'s).
unsafe fn backward_absorb_exact(mut prev: NonNull<Header>, header: NonNull<Header>) -> *mut u8 {
	unsafe {
		let payload_size = header.as_ref().payload_size;
		let src = Header::payload_start(header);
		let dst = Header::payload_start(prev);
		ptr::copy(src.as_ptr(), dst.as_ptr(), payload_size);

		Header::unlink(header);
		prev.as_mut().payload_size += header_footprint() + payload_size;
		prev.as_mut().status = Status::InUse;

		dst.as_ptr()
	}
}

/// Absorbs just enough of `header` into `prev` to reach `s` bytes, leaving a
/// new FREE remainder chunk after the grown allocation. Returns the
/// resulting payload address (`prev`'s).
unsafe fn backward_absorb_split(mut prev: NonNull<Header>, header: NonNull<Header>, s: usize) -> *mut u8 {
	unsafe {
		let footprint = header_footprint();
		let prev_payload_before = prev.as_ref().payload_size;
		let header_payload_before = header.as_ref().payload_size;
		let total_span = prev_payload_before + footprint + header_payload_before;
		let next_of_header = header.as_ref().next;

		let src = Header::payload_start(header);
		let dst = Header::payload_start(prev);
		ptr::copy(src.as_ptr(), dst.as_ptr(), header_payload_before);

		prev.as_mut().payload_size = s;
		prev.as_mut().status = Status::InUse;

		let remainder_addr = dst.as_ptr().add(s);
		let remainder_size = total_span - s - footprint;
		let mut remainder = Header::format(NonNull::new_unchecked(remainder_addr), remainder_size);
		remainder.as_mut().prev = Some(prev);
		remainder.as_mut().next = next_of_header;
		if let Some(mut after) = next_of_header {
			after.as_mut().prev = Some(remainder);
		}
		prev.as_mut().next = Some(remainder);

		dst.as_ptr()
	}
}

impl<P: BreakProvider> Heap<P> {
	/// Grows the allocation headed by `header` to `s` payload bytes, trying
	/// forward absorb (exact, then split), backward absorb (exact, then
	/// split), and finally an acquire-copy-release relocation, in that order.
	///
	/// # Safety
	/// `header` must be a live, INUSE chunk of this heap with
	/// `header.payload_size < s`.
	pub(crate) unsafe fn expand(&self, mut header: NonNull<Header>, s: usize) -> *mut u8 {
		let footprint = header_footprint();

		if let Some(next) = unsafe { header.as_ref().next } {
			if unsafe { next.as_ref().status } == Status::Free {
				let header_payload = unsafe { header.as_ref().payload_size };
				let next_payload = unsafe { next.as_ref().payload_size };

				if header_payload + footprint + next_payload == s {
					unsafe {
						Header::unlink(next);
						header.as_mut().payload_size += footprint + next_payload;
					}
					return unsafe { Header::payload_start(header).as_ptr() };
				} else if header_payload + next_payload >= s + MIN_FREE_CHUNK {
					unsafe { forward_absorb_split(header, next, s) };
					return unsafe { Header::payload_start(header).as_ptr() };
				}
			}
		}

		if let Some(prev) = unsafe { header.as_ref().prev } {
			if unsafe { prev.as_ref().status } == Status::Free {
				let header_payload = unsafe { header.as_ref().payload_size };
				let prev_payload = unsafe { prev.as_ref().payload_size };

				if prev_payload + footprint + header_payload == s {
					return unsafe { backward_absorb_exact(prev, header) };
				} else if prev_payload + header_payload >= s + MIN_FREE_CHUNK {
					return unsafe { backward_absorb_split(prev, header, s) };
				}
			}
		}

		unsafe { self.relocate(header, s) }
	}

	/// Shrinks the allocation headed by `header` to `s` payload bytes, trying
	/// a forward slide of a FREE next-neighbor, then an in-place split, and
	/// finally an acquire-copy-release relocation.
	///
	/// # Safety
	/// `header` must be a live, INUSE chunk of this heap with
	/// `header.payload_size > s`.
	pub(crate) unsafe fn shrink(&self, mut header: NonNull<Header>, s: usize) -> *mut u8 {
		if let Some(next) = unsafe { header.as_ref().next } {
			if unsafe { next.as_ref().status } == Status::Free {
				let footprint = header_footprint();
				let reclaimed = unsafe { header.as_ref().payload_size } - s;
				let new_addr = unsafe { Header::payload_start(header).as_ptr().add(s) };

				unsafe {
					ptr::copy(next.as_ptr().cast::<u8>(), new_addr, footprint);
					let mut moved = NonNull::new_unchecked(new_addr.cast::<Header>());
					moved.as_mut().payload_size += reclaimed;
					if let Some(mut after) = moved.as_ref().next {
						after.as_mut().prev = Some(moved);
					}
					header.as_mut().next = Some(moved);
					header.as_mut().payload_size = s;
				}
				return unsafe { Header::payload_start(header).as_ptr() };
			}
		}

		let footprint = header_footprint();
		if s + footprint + MIN_FREE_CHUNK <= unsafe { header.as_ref().payload_size } {
			unsafe { divide(header, s) };
			return unsafe { Header::payload_start(header).as_ptr() };
		}

		unsafe { self.relocate(header, s) }
	}

	/// Acquires a fresh `s`-byte chunk, copies the live payload of `header`
	/// into it (truncating to `s` bytes, which only happens on the shrink
	/// path since expand's relocation always has `s` bigger than the
	/// original), releases `header`, and returns the new address (or null,
	/// leaving `header` untouched, if the fresh acquire failed).
	unsafe fn relocate(&self, header: NonNull<Header>, s: usize) -> *mut u8 {
		let old_ptr = unsafe { Header::payload_start(header).as_ptr() };
		let old_size = unsafe { header.as_ref().payload_size };
		let copy_len = old_size.min(s);

		let new_ptr = self.acquire(s);
		if new_ptr.is_null() {
			return ptr::null_mut();
		}

		unsafe { ptr::copy_nonoverlapping(old_ptr, new_ptr, copy_len) };
		self.release(old_ptr);
		new_ptr
	}
}
