//! Per-node-type serialization adapters.
//!
//! Each live node type has a flat state record implementing [`NodeState`]:
//! `write_params` and `read_params` shuttle the constructor parameters and
//! mutable field snapshots through the codec in a fixed order (common
//! fields first, then kind-specific fields, then owned children),
//! `create` constructs the live object from stored parameters, and `build`
//! runs in the second phase once every referenced symbol can be resolved.
//!
//! State records exist only for the duration of one session.

mod geometry;
mod group;
mod interpolator;
mod shape;
mod view;

pub(crate) use geometry::GeometryState;

use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::symbols::{LiveRef, SymbolId};
use crate::scene::capability::Capabilities;
use crate::scene::node::{Node, NodeKind};
use crate::scene::{NodeKey, Universe};

/// Wire tag identifying the state adapter for a node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum NodeTag {
    Group = 0x01,
    BranchGroup = 0x02,
    TransformGroup = 0x03,
    Shape = 0x04,
    ViewPlatform = 0x05,
    TcbInterpolator = 0x06,
}

impl NodeTag {
    pub(crate) fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Group),
            0x02 => Ok(Self::BranchGroup),
            0x03 => Ok(Self::TransformGroup),
            0x04 => Ok(Self::Shape),
            0x05 => Ok(Self::ViewPlatform),
            0x06 => Ok(Self::TcbInterpolator),
            other => Err(OrreryError::UnknownTag(other)),
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Group => Self::Group,
            NodeKind::BranchGroup => Self::BranchGroup,
            NodeKind::TransformGroup { .. } => Self::TransformGroup,
            NodeKind::Shape { .. } => Self::Shape,
            NodeKind::ViewPlatform { .. } => Self::ViewPlatform,
            NodeKind::TcbInterpolator { .. } => Self::TcbInterpolator,
        }
    }
}

/// Serialization hooks shared by every state adapter.
///
/// `write_params`/`read_params` must be exact stream inverses. `create` is
/// invoked at most once per record, lazily, the first time the symbol is
/// resolved. `build` runs exactly once per record after phase 1, in record
/// order; it is the only hook allowed to touch other live objects.
pub(crate) trait NodeState {
    fn write_params(&self, w: &mut SceneWriter<'_>, sess: &mut WriteSession<'_>) -> Result<()>;
    fn read_params(&mut self, r: &mut SceneReader<'_>, sess: &mut ReadSession) -> Result<()>;
    fn create(&self, universe: &mut Universe) -> Result<LiveRef>;
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<()>;
}

/// Fields shared by every node record, always first on the wire.
#[derive(Debug, Default, Clone)]
pub(crate) struct CommonState {
    pub name: Option<String>,
    pub capabilities: u32,
}

impl CommonState {
    pub fn capture(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            capabilities: node.capabilities.bits(),
        }
    }

    pub fn write(&self, w: &mut SceneWriter<'_>) -> Result<()> {
        w.write_opt_string(self.name.as_deref())?;
        w.write_u32(self.capabilities)
    }

    pub fn read(&mut self, r: &mut SceneReader<'_>) -> Result<()> {
        self.name = r.read_opt_string()?;
        self.capabilities = r.read_u32()?;
        Ok(())
    }

    /// Constructs a live node carrying these common fields.
    pub fn to_node(&self, kind: NodeKind) -> Node {
        let mut node = Node::new(kind);
        node.name = self.name.clone();
        // Unknown future bits are dropped rather than invented.
        node.capabilities = Capabilities::from_bits_truncate(self.capabilities);
        node
    }
}

/// Write-side dispatch: extracts the state record for a live node.
pub(crate) fn capture(
    universe: &Universe,
    key: NodeKey,
    symbol: SymbolId,
) -> Result<Box<dyn NodeState>> {
    let node = universe.node(key).ok_or(OrreryError::NodeNotFound)?;
    Ok(match node.kind {
        NodeKind::Group | NodeKind::BranchGroup | NodeKind::TransformGroup { .. } => {
            Box::new(group::GroupState::capture(node, symbol))
        }
        NodeKind::Shape { .. } => Box::new(shape::ShapeState::capture(node, symbol)),
        NodeKind::ViewPlatform { .. } => Box::new(view::ViewPlatformState::capture(node, symbol)),
        NodeKind::TcbInterpolator { .. } => {
            Box::new(interpolator::TcbInterpolatorState::capture(node, symbol))
        }
    })
}

/// Read-side dispatch: a blank state record for `tag`, ready for
/// `read_params`.
pub(crate) fn blank(tag: NodeTag, symbol: SymbolId) -> Box<dyn NodeState> {
    match tag {
        NodeTag::Group => Box::new(group::GroupState::blank(symbol, NodeTag::Group)),
        NodeTag::BranchGroup => Box::new(group::GroupState::blank(symbol, NodeTag::BranchGroup)),
        NodeTag::TransformGroup => {
            Box::new(group::GroupState::blank(symbol, NodeTag::TransformGroup))
        }
        NodeTag::Shape => Box::new(shape::ShapeState::blank(symbol)),
        NodeTag::ViewPlatform => Box::new(view::ViewPlatformState::blank(symbol)),
        NodeTag::TcbInterpolator => Box::new(interpolator::TcbInterpolatorState::blank(symbol)),
    }
}
