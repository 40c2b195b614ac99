use core::ptr::NonNull;

use crate::align::header_footprint;
use crate::config::{HEAP_CHUNK, MIN_FREE_CHUNK, MIN_UNIT};
use crate::error::HeapDiagnostic;
use crate::header::{Header, Status};
use crate::list::merge;

/// Abstracts over the process-break-style primitive the Heap Grower depends
/// on: "what's the current break" and "advance the break by n bytes". The
/// engine calls `extend` at most once per grow and never calls anything that
/// would shrink the break.
///
/// # Safety
/// Implementors must guarantee that the byte range `[prev, prev + bytes)`
/// returned by a successful `extend(bytes)` call is valid for reads and
/// writes for as long as the provider itself is alive, and that it never
/// overlaps a range returned by any other successful `extend` call on the
/// same provider.
pub unsafe trait BreakProvider {
	/// Returns the current break address.
	fn current_break(&self) -> *mut u8;

	/// Advances the break by `bytes` bytes. Returns the break address as it
	/// was *before* the extension, or `None` if the provider can't satisfy
	/// the request.
	fn extend(&self, bytes: usize) -> Option<*mut u8>;
}

/// A `BreakProvider` backed by the real OS process break (`sbrk`). The
/// allocator never shrinks the break, so the only syscall this type ever
/// issues is a positive `sbrk` increment.
#[cfg(feature = "sbrk")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBreak;

#[cfg(feature = "sbrk")]
unsafe impl BreakProvider for SystemBreak {
	fn current_break(&self) -> *mut u8 {
		unsafe { libc::sbrk(0).cast() }
	}

	fn extend(&self, bytes: usize) -> Option<*mut u8> {
		let increment = isize::try_from(bytes).ok()?;
		let prev = unsafe { libc::sbrk(increment) };
		if prev as isize == -1 { None } else { Some(prev.cast()) }
	}
}

/// Computes the number of bytes to request from the Break Provider so that
/// an allocation of `s` payload bytes can be carved out of the result,
/// preferring a generously sized `HEAP_CHUNK`-ish region over many small
/// `sbrk` calls, but inflating the request further when the generous size
/// wouldn't leave room for a conformant free remainder after the split.
fn request_size(s: usize) -> usize {
	let footprint = header_footprint();
	let mut request = HEAP_CHUNK + footprint;

	if s + footprint > request {
		request = s + footprint;
	} else if request - (s + footprint) < footprint + MIN_FREE_CHUNK {
		request = 2 * footprint + s + MIN_FREE_CHUNK;
	}

	request
}

/// Grows the heap to satisfy an allocation of `s` payload bytes: requests a
/// fresh region from `provider`, formats it as a single FREE chunk, and
/// splices it onto the tail of the chunk list rooted at `*heap_start`
/// (coalescing with the prior tail if it was FREE). Returns the chunk that
/// should now be handed to the caller's `divide`/mark-in-use step.
///
/// # Safety
/// Every header reachable from `*heap_start` via `next` must be live, and no
/// other chunk header may be concurrently mutated.
pub unsafe fn grow<P: BreakProvider>(
	provider: &P,
	heap_start: &mut Option<NonNull<Header>>,
	s: usize,
) -> Result<NonNull<Header>, HeapDiagnostic> {
	if heap_start.is_none() {
		let current = provider.current_break() as usize;
		let offset = (MIN_UNIT - current % MIN_UNIT) % MIN_UNIT;
		if offset != 0 && provider.extend(offset).is_none() {
			return Err(HeapDiagnostic::OutOfMemory { requested: offset });
		}
	}

	let footprint = header_footprint();
	let request = request_size(s);

	let region_start = provider
		.extend(request)
		.and_then(NonNull::new)
		.ok_or(HeapDiagnostic::OutOfMemory { requested: request })?;

	let new_header = unsafe { Header::format(region_start, request - footprint) };

	let result = match *heap_start {
		None => {
			*heap_start = Some(new_header);
			new_header
		}
		Some(start) => {
			let tail = unsafe { Header::tail_of(start) };
			let tail_was_free = unsafe { tail.as_ref().status } == Status::Free;
			unsafe { Header::splice_after(tail, new_header) };
			if tail_was_free { unsafe { merge(tail) } } else { new_header }
		}
	};

	Ok(result)
}
