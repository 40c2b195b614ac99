//! Tunable constants for the allocator engine.
//!
//! These are compile-time constants rather than a runtime-configurable struct:
//! the engine's invariants (minimum free-chunk size, header footprint alignment)
//! are derived from them at several call sites, so changing them per-instance
//! would mean carrying them alongside every `Header`, not just the `Heap`.

/// The smallest unit of memory the allocator hands out. All payload sizes and
/// addresses are multiples of this value. Also the allocator's alignment
/// guarantee: every address returned by `acquire`/`resize`/`zeroed_acquire`
/// is a multiple of `MIN_UNIT`.
pub const MIN_UNIT: usize = 16;

/// The default size requested from the Break Provider when the free list has
/// no chunk large enough to satisfy a request. Chosen so that a typical
/// sequence of small allocations doesn't call into the Break Provider on
/// every single one of them.
pub const HEAP_CHUNK: usize = MIN_UNIT * 4000;

/// The smallest payload size a FREE chunk is allowed to have. Splitting a
/// chunk that would leave a smaller free remainder is refused; the whole
/// chunk is handed out instead. Bounds the number of tiny, useless free
/// chunks the free list can accumulate.
pub const MIN_FREE_CHUNK: usize = MIN_UNIT * 10;
