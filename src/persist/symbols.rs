use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{OrreryError, Result};
use crate::scene::{GeometryKey, NodeKey};

/// Serialization identity of a live object, stable for one session.
///
/// IDs are allocated sequentially from 0, exactly once per distinct live
/// object, at the moment the object is first referenced. Forward references
/// are therefore resolved by ID lookup, never by object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to a live object, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveRef {
    Node(NodeKey),
    Geometry(GeometryKey),
}

/// Read-side record for one symbol: which state adapter will construct the
/// object, and the object itself once it exists.
struct SymbolEntry {
    state: usize,
    object: Option<LiveRef>,
}

/// Session-scoped ID ↔ object registry.
///
/// "ID known" is deliberately decoupled from "object fully built": the
/// scene graph contains forward and shared references, so a symbol may be
/// referenced long before (or after) its state record is materialized.
/// Callers that hit a pending symbol defer the dependent operation to the
/// build phase rather than fail.
///
/// A table is exclusively owned by one serialize or deserialize session and
/// discarded with it.
#[derive(Default)]
pub struct SymbolTable {
    next_id: u32,
    // Write side: identity → ID, plus which payloads were emitted.
    ids: FxHashMap<LiveRef, SymbolId>,
    written: FxHashSet<SymbolId>,
    // Read side: ID → reconstruction record.
    entries: FxHashMap<u32, SymbolEntry>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of `object`, allocating the next sequential ID at
    /// first sight.
    pub fn add_reference(&mut self, object: LiveRef) -> SymbolId {
        if let Some(&id) = self.ids.get(&object) {
            return id;
        }
        let id = SymbolId(self.next_id);
        self.next_id += 1;
        self.ids.insert(object, id);
        id
    }

    /// Marks a symbol's payload as emitted. Returns false if it already was.
    pub fn mark_written(&mut self, id: SymbolId) -> bool {
        self.written.insert(id)
    }

    /// First symbol that was referenced but whose payload was never emitted.
    /// A successful write session has none.
    #[must_use]
    pub fn first_unwritten(&self) -> Option<SymbolId> {
        self.ids
            .values()
            .copied()
            .filter(|id| !self.written.contains(id))
            .min_by_key(|id| id.0)
    }

    /// Number of IDs allocated this session.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next_id
    }

    /// Records the state adapter that will construct symbol `id`.
    /// Each symbol gets exactly one state record.
    pub fn record_state(&mut self, id: SymbolId, state: usize) -> Result<()> {
        if self.entries.contains_key(&id.0) {
            return Err(OrreryError::DuplicateState(id.0));
        }
        self.entries.insert(id.0, SymbolEntry { state, object: None });
        Ok(())
    }

    /// Stores the reconstructed object for `id`.
    ///
    /// Registering the same symbol twice is an internal invariant violation
    /// (the object would have been constructed twice) and fails.
    pub fn register_reconstructed(&mut self, id: SymbolId, object: LiveRef) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&id.0)
            .ok_or(OrreryError::UnresolvedSymbol(id.0))?;
        if entry.object.is_some() {
            return Err(OrreryError::DuplicateSymbol(id.0));
        }
        entry.object = Some(object);
        Ok(())
    }

    /// The reconstructed object for `id`, or None while it is pending.
    #[must_use]
    pub fn lookup(&self, id: SymbolId) -> Option<LiveRef> {
        self.entries.get(&id.0).and_then(|e| e.object)
    }

    /// Index of the state adapter recorded for `id`.
    #[must_use]
    pub fn state_index(&self, id: SymbolId) -> Option<usize> {
        self.entries.get(&id.0).map(|e| e.state)
    }

    /// All IDs with a state record, ascending.
    #[must_use]
    pub fn recorded_ids(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self.entries.keys().map(|&k| SymbolId(k)).collect();
        ids.sort_unstable_by_key(|id| id.0);
        ids
    }
}
