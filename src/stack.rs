//! Stack growth for the recursive passes.
//!
//! Parser, resolver and interpreter all recurse on the shape of the program.
//! Wrapping each recursive step in [`ensure_sufficient_stack`] moves deep
//! nesting onto heap-allocated stack segments instead of overflowing the
//! thread's own stack.  Depth limits elsewhere turn runaway recursion into a
//! reported error.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
