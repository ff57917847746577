use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::states::{self, GeometryState, NodeState, NodeTag};
use crate::persist::symbols::{LiveRef, SymbolId, SymbolTable};
use crate::scene::{GeometryKey, NodeKey, Universe};

/// Write-side session state: the symbol table plus the universe being
/// traversed. Owned for the duration of one save call.
pub(crate) struct WriteSession<'a> {
    pub universe: &'a Universe,
    pub symbols: SymbolTable,
}

impl<'a> WriteSession<'a> {
    pub fn new(universe: &'a Universe) -> Self {
        Self {
            universe,
            symbols: SymbolTable::new(),
        }
    }

    /// Emits a full node record: tag, symbol ID, then the adapter payload.
    ///
    /// This is the structural-ownership path; a node may be written this
    /// way exactly once per session. A second structural write means the
    /// live graph gave one node two owners, which is an internal invariant
    /// violation.
    pub fn write_node(&mut self, w: &mut SceneWriter<'_>, key: NodeKey) -> Result<()> {
        let id = self.symbols.add_reference(LiveRef::Node(key));
        if !self.symbols.mark_written(id) {
            return Err(OrreryError::DuplicateSymbol(id.raw()));
        }
        let node = self.universe.node(key).ok_or(OrreryError::NodeNotFound)?;
        let tag = NodeTag::of(&node.kind);
        w.write_u8(tag.as_u8())?;
        w.write_u32(id.raw())?;
        let state = states::capture(self.universe, key, id)?;
        state.write_params(w, self)
    }

    /// Emits a geometry reference: symbol ID, inline flag, and the payload
    /// if this is the first sight of the component. Shared geometry keeps
    /// one ID across every referencing shape.
    pub fn write_geometry(&mut self, w: &mut SceneWriter<'_>, key: GeometryKey) -> Result<()> {
        let id = self.symbols.add_reference(LiveRef::Geometry(key));
        w.write_u32(id.raw())?;
        if self.symbols.mark_written(id) {
            w.write_bool(true)?;
            let geometry = self
                .universe
                .geometry(key)
                .ok_or(OrreryError::GeometryNotFound)?;
            GeometryState::capture(geometry).write_params(w, self)
        } else {
            w.write_bool(false)
        }
    }

    /// Assigns (or recalls) the symbol ID for a non-owning node reference.
    /// Nothing is written; the record is expected to appear elsewhere in
    /// the stream.
    pub fn reference(&mut self, key: NodeKey) -> SymbolId {
        self.symbols.add_reference(LiveRef::Node(key))
    }
}

/// Read-side session state: the universe under construction, the symbol
/// table, and every state record in stream order.
pub(crate) struct ReadSession {
    pub universe: Universe,
    pub symbols: SymbolTable,
    pub states: Vec<Box<dyn NodeState>>,
}

impl ReadSession {
    pub fn new() -> Self {
        Self {
            universe: Universe::new(),
            symbols: SymbolTable::new(),
            states: Vec::new(),
        }
    }

    /// Phase 1: streams one node record into a state adapter. No live node
    /// is constructed here; construction is deferred until the symbol is
    /// first resolved.
    pub fn read_node(&mut self, r: &mut SceneReader<'_>) -> Result<SymbolId> {
        let tag = NodeTag::from_u8(r.read_u8()?)?;
        let id = SymbolId(r.read_u32()?);
        let mut state = states::blank(tag, id);
        state.read_params(r, self)?;
        let index = self.states.len();
        self.symbols.record_state(id, index)?;
        self.states.push(state);
        Ok(id)
    }

    /// Phase 1 counterpart of [`WriteSession::write_geometry`].
    pub fn read_geometry(&mut self, r: &mut SceneReader<'_>) -> Result<SymbolId> {
        let id = SymbolId(r.read_u32()?);
        if r.read_bool()? {
            let mut state = GeometryState::blank();
            state.read_params(r, self)?;
            let index = self.states.len();
            self.symbols.record_state(id, index)?;
            self.states.push(Box::new(state));
        }
        Ok(id)
    }
}

/// Phase-2 context handed to every adapter's `build` hook.
///
/// Resolution is lazy: the first resolve of a symbol runs its adapter's
/// `create` and registers the result, so build order never has to match
/// discovery order.
pub(crate) struct BuildContext<'a> {
    pub universe: &'a mut Universe,
    pub symbols: &'a mut SymbolTable,
    pub states: &'a [Box<dyn NodeState>],
}

impl BuildContext<'_> {
    pub fn resolve(&mut self, id: SymbolId) -> Result<LiveRef> {
        if let Some(object) = self.symbols.lookup(id) {
            return Ok(object);
        }
        let index = self
            .symbols
            .state_index(id)
            .ok_or(OrreryError::UnresolvedSymbol(id.raw()))?;
        let object = self.states[index].create(self.universe)?;
        self.symbols.register_reconstructed(id, object)?;
        Ok(object)
    }

    pub fn node(&mut self, id: SymbolId) -> Result<NodeKey> {
        match self.resolve(id)? {
            LiveRef::Node(key) => Ok(key),
            LiveRef::Geometry(_) => Err(OrreryError::SymbolKindMismatch {
                id: id.raw(),
                expected: "node",
            }),
        }
    }

    pub fn geometry(&mut self, id: SymbolId) -> Result<GeometryKey> {
        match self.resolve(id)? {
            LiveRef::Geometry(key) => Ok(key),
            LiveRef::Node(_) => Err(OrreryError::SymbolKindMismatch {
                id: id.raw(),
                expected: "geometry",
            }),
        }
    }
}
