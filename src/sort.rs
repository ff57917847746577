//! Per-view transparency sorting.
//!
//! Rendering back ends sort transparent atoms back-to-front by default; a
//! view may install its own comparator. The registry's entries follow the
//! owning view's lifecycle explicitly: a view is registered when created
//! and must be removed when destroyed. Nothing here relies on garbage
//! collection of abandoned views.

use std::cmp::Ordering;

use slotmap::{new_key_type, SlotMap};

use crate::scene::NodeKey;

new_key_type! {
    /// Handle for one rendering view's registry entry.
    pub struct ViewKey;
}

/// One transparent item to be ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortAtom {
    /// The shape this atom renders.
    pub shape: NodeKey,
    /// View-space depth; larger is farther from the eye.
    pub depth: f32,
}

/// Comparator deciding the draw order of two atoms.
pub type TransparencyComparator = Box<dyn Fn(&SortAtom, &SortAtom) -> Ordering + Send + Sync>;

/// Registry of per-view transparency comparators.
#[derive(Default)]
pub struct TransparencySortRegistry {
    views: SlotMap<ViewKey, Option<TransparencyComparator>>,
}

impl TransparencySortRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a view with the default back-to-front ordering.
    pub fn register_view(&mut self) -> ViewKey {
        self.views.insert(None)
    }

    /// Installs a custom comparator for `view`. Returns false if the view
    /// was already removed.
    pub fn set_comparator(&mut self, view: ViewKey, comparator: TransparencyComparator) -> bool {
        match self.views.get_mut(view) {
            Some(slot) => {
                *slot = Some(comparator);
                true
            }
            None => false,
        }
    }

    /// Drops a view's entry. Must be called when the owning view is
    /// destroyed.
    pub fn remove_view(&mut self, view: ViewKey) {
        self.views.remove(view);
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Orders `atoms` for `view`: its installed comparator, or the default
    /// back-to-front depth ordering for unknown views and views without
    /// one.
    pub fn sort(&self, view: ViewKey, atoms: &mut [SortAtom]) {
        match self.views.get(view).and_then(Option::as_ref) {
            Some(comparator) => atoms.sort_by(|a, b| comparator(a, b)),
            None => atoms.sort_by(|a, b| b.depth.total_cmp(&a.depth)),
        }
    }
}
