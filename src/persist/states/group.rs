use glam::Mat4;

use crate::errors::Result;
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::states::{CommonState, NodeState, NodeTag};
use crate::persist::symbols::{LiveRef, SymbolId};
use crate::scene::node::{Node, NodeKind};
use crate::scene::{NodeKey, Universe};

/// State record for the grouping kinds: plain groups, branch groups, and
/// transform groups. The transform matrix is present on the wire only for
/// [`NodeTag::TransformGroup`].
///
/// Field order: common, transform (transform groups), owned children.
/// Children are whole records written inline; their IDs are recovered from
/// the record headers on read, nth child at index n.
pub(crate) struct GroupState {
    symbol: SymbolId,
    tag: NodeTag,
    common: CommonState,
    transform: Mat4,
    live_children: Vec<NodeKey>,
    children: Vec<SymbolId>,
}

impl GroupState {
    pub fn capture(node: &Node, symbol: SymbolId) -> Self {
        let transform = match node.kind {
            NodeKind::TransformGroup { transform } => transform,
            _ => Mat4::IDENTITY,
        };
        Self {
            symbol,
            tag: NodeTag::of(&node.kind),
            common: CommonState::capture(node),
            transform,
            live_children: node.children().to_vec(),
            children: Vec::new(),
        }
    }

    pub fn blank(symbol: SymbolId, tag: NodeTag) -> Self {
        Self {
            symbol,
            tag,
            common: CommonState::default(),
            transform: Mat4::IDENTITY,
            live_children: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl NodeState for GroupState {
    fn write_params(&self, w: &mut SceneWriter<'_>, sess: &mut WriteSession<'_>) -> Result<()> {
        self.common.write(w)?;
        if self.tag == NodeTag::TransformGroup {
            w.write_mat4(&self.transform)?;
        }
        w.write_len(self.live_children.len())?;
        for &child in &self.live_children {
            sess.write_node(w, child)?;
        }
        Ok(())
    }

    fn read_params(&mut self, r: &mut SceneReader<'_>, sess: &mut ReadSession) -> Result<()> {
        self.common.read(r)?;
        if self.tag == NodeTag::TransformGroup {
            self.transform = r.read_mat4()?;
        }
        let count = r.read_len()?;
        self.children.reserve(count.min(1 << 16));
        for _ in 0..count {
            self.children.push(sess.read_node(r)?);
        }
        Ok(())
    }

    fn create(&self, universe: &mut Universe) -> Result<LiveRef> {
        let kind = match self.tag {
            NodeTag::TransformGroup => NodeKind::TransformGroup {
                transform: self.transform,
            },
            NodeTag::BranchGroup => NodeKind::BranchGroup,
            _ => NodeKind::Group,
        };
        Ok(LiveRef::Node(universe.add_node(self.common.to_node(kind))))
    }

    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let parent = ctx.node(self.symbol)?;
        for &id in &self.children {
            let child = ctx.node(id)?;
            ctx.universe.add_child(parent, child)?;
        }
        Ok(())
    }
}
