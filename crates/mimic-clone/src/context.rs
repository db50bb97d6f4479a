//! Per-invocation clone state.

use mimic_value::Value;
use rustc_hash::{FxHashMap, FxHashSet};

/// State threaded through one top-level clone invocation.
///
/// `visited` maps the reference identity of an original node to the clone
/// already produced for it. The lookup runs before any per-kind work and is
/// the sole cycle-breaking mechanism; it is also what preserves shared
/// references (two branches pointing at one node end up pointing at one
/// clone). `hook_active` tracks which values are currently inside a custom
/// instancing hook, so a hook that delegates back into the engine does not
/// re-invoke itself on the same value forever.
///
/// A context is created fresh per top-level call and passed `&mut` through
/// every recursive step, including into hooks. It is never stored anywhere
/// longer-lived.
#[derive(Debug, Default)]
pub struct CloneContext {
    visited: FxHashMap<usize, Value>,
    hook_active: FxHashSet<usize>,
}

impl CloneContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The clone already produced for the node with reference identity
    /// `id`, if any.
    pub fn lookup(&self, id: usize) -> Option<Value> {
        self.visited.get(&id).cloned()
    }

    /// Record `clone` as the result for the node with reference identity
    /// `id`. Overwrites any provisional entry, so a hook's result replaces
    /// what a re-entrant structural pass registered for the same node.
    pub fn register(&mut self, id: usize, clone: Value) {
        self.visited.insert(id, clone);
    }

    /// Mark `id` as inside its hook. `false` when the hook is already
    /// active for this value (the caller must take the structural path).
    pub(crate) fn hook_enter(&mut self, id: usize) -> bool {
        self.hook_active.insert(id)
    }

    pub(crate) fn hook_exit(&mut self, id: usize) {
        self.hook_active.remove(&id);
    }
}
