/// A diagnostic describing a non-fatal condition the allocator ran into.
/// None of these are returned from the four public operations (they return
/// null on failure, matching the C-shaped contract this crate models), but
/// they are available for callers (and the `trace` feature) to observe.
#[derive(thiserror::Error, Debug, Clone, Copy)]
pub enum HeapDiagnostic {
	/// The Break Provider refused to grow the arena by the requested amount.
	#[error("out of memory: the break provider could not grow the arena by {requested} bytes")]
	OutOfMemory { requested: usize },

	/// `release`/`resize` was called with an address that doesn't belong to
	/// any live chunk in this heap.
	#[error("release() called on a pointer ({0:p}) that does not belong to this heap")]
	UnknownPointer(*const u8),

	/// `release`/`resize` was called with an address whose chunk is already
	/// FREE.
	#[error("double free detected at {0:p}")]
	DoubleFree(*const u8),
}

// `HeapDiagnostic` carries raw pointers purely as opaque identifiers for
// `Display`/tracing; it never dereferences them, so it's safe to treat it as
// inert data across threads.
unsafe impl Send for HeapDiagnostic {}
unsafe impl Sync for HeapDiagnostic {}
