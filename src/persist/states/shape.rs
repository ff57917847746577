use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::states::{CommonState, NodeState};
use crate::persist::symbols::{LiveRef, SymbolId};
use crate::scene::node::{Node, NodeKind};
use crate::scene::{GeometryKey, Universe};

/// State record for shape leaves.
///
/// The geometry is a shared component: the first shape to mention it writes
/// the payload inline, later shapes write a bare back-reference. Either
/// way the shape only stores the geometry's symbol ID and resolves it in
/// the build phase.
pub(crate) struct ShapeState {
    symbol: SymbolId,
    common: CommonState,
    live_geometry: Option<GeometryKey>,
    geometry: Option<SymbolId>,
}

impl ShapeState {
    pub fn capture(node: &Node, symbol: SymbolId) -> Self {
        let live_geometry = match node.kind {
            NodeKind::Shape { geometry } => geometry,
            _ => None,
        };
        Self {
            symbol,
            common: CommonState::capture(node),
            live_geometry,
            geometry: None,
        }
    }

    pub fn blank(symbol: SymbolId) -> Self {
        Self {
            symbol,
            common: CommonState::default(),
            live_geometry: None,
            geometry: None,
        }
    }
}

impl NodeState for ShapeState {
    fn write_params(&self, w: &mut SceneWriter<'_>, sess: &mut WriteSession<'_>) -> Result<()> {
        self.common.write(w)?;
        match self.live_geometry {
            Some(key) => {
                w.write_bool(true)?;
                sess.write_geometry(w, key)
            }
            None => w.write_bool(false),
        }
    }

    fn read_params(&mut self, r: &mut SceneReader<'_>, sess: &mut ReadSession) -> Result<()> {
        self.common.read(r)?;
        if r.read_bool()? {
            self.geometry = Some(sess.read_geometry(r)?);
        }
        Ok(())
    }

    fn create(&self, universe: &mut Universe) -> Result<LiveRef> {
        let node = self.common.to_node(NodeKind::Shape { geometry: None });
        Ok(LiveRef::Node(universe.add_node(node)))
    }

    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let Some(id) = self.geometry else {
            return Ok(());
        };
        let geometry = ctx.geometry(id)?;
        let key = ctx.node(self.symbol)?;
        match &mut ctx.universe.nodes[key].kind {
            NodeKind::Shape { geometry: slot } => {
                *slot = Some(geometry);
                Ok(())
            }
            _ => Err(OrreryError::WrongNodeKind { expected: "shape" }),
        }
    }
}
