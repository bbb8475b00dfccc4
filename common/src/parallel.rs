//! Concurrency-limited parallel iteration utilities.
//!
//! Wraps rayon to fan work out over an index range while limiting how many
//! indices are in flight at once, so per-index output buffers stay bounded.

use rayon::prelude::*;

/// Runs `f` for every index in `0..count` in parallel and concatenates the
/// produced vectors in index order.
///
/// At most `max_concurrent` indices are processed at the same time.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn par_flat_map_limited<R, F>(count: usize, max_concurrent: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> Vec<R> + Sync,
{
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::new();
    let mut start = 0;
    while start < count {
        let end = (start + max_concurrent).min(count);
        let chunk: Vec<Vec<R>> = (start..end).into_par_iter().map(&f).collect();
        for part in chunk {
            results.extend(part);
        }
        start = end;
    }
    results
}
