//! Segment Registry - Index allocation for the parallel arrays.
//!
//! Hands out array indices for segments and tracks which are live. Freed
//! indices are pooled and reused; every allocation carries a unique string
//! id, so an `(index, id)` pair works as an ownership-checked handle:
//! deferred work verifies the id before writing, and an index that was
//! recycled for a different segment no longer matches.
//!
//! The allocated-index set is a `ReactiveSet`, so deriveds that iterate
//! segments re-run when one is added or removed.

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::ReactiveSet;

use super::arrays;

// =============================================================================
// Registry State
// =============================================================================

#[derive(Default)]
struct Registry {
    /// id -> index and index -> id, kept in lockstep.
    by_id: HashMap<String, usize>,
    by_index: HashMap<usize, String>,
    /// Freed indices, reused LIFO.
    free: Vec<usize>,
    /// High-water mark when the pool is empty.
    next: usize,
    /// Monotonic id counter. Survives releases, so reused indices always
    /// get a fresh id.
    id_counter: usize,
}

impl Registry {
    fn generate_id(&mut self) -> String {
        let id = format!("seg{}", self.id_counter);
        self.id_counter += 1;
        id
    }

    fn take_index(&mut self) -> usize {
        self.free.pop().unwrap_or_else(|| {
            let index = self.next;
            self.next += 1;
            index
        })
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());

    /// Live indices, reactive for iteration.
    static ALLOCATED: RefCell<ReactiveSet<usize>> = RefCell::new(ReactiveSet::new());
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate an index for a new segment.
///
/// An explicit `id` that is already allocated returns its existing index;
/// otherwise a fresh id is generated.
pub fn allocate_index(id: Option<&str>) -> usize {
    let index = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();

        let segment_id = match id {
            Some(id) => {
                if let Some(&existing) = reg.by_id.get(id) {
                    return existing;
                }
                id.to_string()
            }
            None => reg.generate_id(),
        };

        let index = reg.take_index();
        reg.by_id.insert(segment_id.clone(), index);
        reg.by_index.insert(index, segment_id);
        index
    });

    ALLOCATED.with(|set| {
        if !set.borrow().contains(&index) {
            set.borrow_mut().insert(index);
            arrays::ensure_all_capacity(index);
        }
    });

    index
}

/// Release an index back to the pool. Unknown indices are ignored.
pub fn release_index(index: usize) {
    let released = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        match reg.by_index.remove(&index) {
            Some(id) => {
                reg.by_id.remove(&id);
                reg.free.push(index);
                true
            }
            None => false,
        }
    });
    if !released {
        return;
    }

    ALLOCATED.with(|set| set.remove(&index));
    arrays::clear_all_at_index(index);

    // Last one out: drop the arrays and restart indices from zero. The id
    // counter keeps running so stale handles stay stale.
    if ALLOCATED.with(|set| set.is_empty()) {
        arrays::reset_all_arrays();
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.free.clear();
            reg.next = 0;
        });
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a segment ID.
pub fn get_index(id: &str) -> Option<usize> {
    REGISTRY.with(|reg| reg.borrow().by_id.get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    REGISTRY.with(|reg| reg.borrow().by_index.get(&index).cloned())
}

/// Get all currently allocated indices.
///
/// Note: This creates a reactive dependency when called from a derived/effect.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED.with(|set| set.iter())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED.with(|set| set.contains(&index))
}

/// Get the count of currently allocated segments.
pub fn get_allocated_count() -> usize {
    ALLOCATED.with(|set| set.len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    REGISTRY.with(|reg| *reg.borrow_mut() = Registry::default());
    ALLOCATED.with(|set| set.clear());
    arrays::reset_all_arrays();
}
