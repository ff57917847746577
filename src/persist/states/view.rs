use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::states::{CommonState, NodeState};
use crate::persist::symbols::{LiveRef, SymbolId};
use crate::scene::node::{Node, NodeKind};
use crate::scene::{NodeKey, Universe};

/// State record for view platforms.
///
/// The platform geometry and avatar are owned subtrees serialized inline
/// (they hang off the platform, not off a locale). Wiring them back onto
/// the reconstructed platform needs both sides to exist, so it happens in
/// the build phase.
pub(crate) struct ViewPlatformState {
    symbol: SymbolId,
    common: CommonState,
    live_platform_geometry: Option<NodeKey>,
    live_avatar: Option<NodeKey>,
    platform_geometry: Option<SymbolId>,
    avatar: Option<SymbolId>,
}

impl ViewPlatformState {
    pub fn capture(node: &Node, symbol: SymbolId) -> Self {
        let (live_platform_geometry, live_avatar) = match node.kind {
            NodeKind::ViewPlatform {
                platform_geometry,
                avatar,
            } => (platform_geometry, avatar),
            _ => (None, None),
        };
        Self {
            symbol,
            common: CommonState::capture(node),
            live_platform_geometry,
            live_avatar,
            platform_geometry: None,
            avatar: None,
        }
    }

    pub fn blank(symbol: SymbolId) -> Self {
        Self {
            symbol,
            common: CommonState::default(),
            live_platform_geometry: None,
            live_avatar: None,
            platform_geometry: None,
            avatar: None,
        }
    }

    fn write_subgraph(
        w: &mut SceneWriter<'_>,
        sess: &mut WriteSession<'_>,
        root: Option<NodeKey>,
    ) -> Result<()> {
        match root {
            Some(key) => {
                w.write_bool(true)?;
                sess.write_node(w, key)
            }
            None => w.write_bool(false),
        }
    }

    fn read_subgraph(
        r: &mut SceneReader<'_>,
        sess: &mut ReadSession,
    ) -> Result<Option<SymbolId>> {
        if r.read_bool()? {
            Ok(Some(sess.read_node(r)?))
        } else {
            Ok(None)
        }
    }
}

impl NodeState for ViewPlatformState {
    fn write_params(&self, w: &mut SceneWriter<'_>, sess: &mut WriteSession<'_>) -> Result<()> {
        self.common.write(w)?;
        Self::write_subgraph(w, sess, self.live_platform_geometry)?;
        Self::write_subgraph(w, sess, self.live_avatar)
    }

    fn read_params(&mut self, r: &mut SceneReader<'_>, sess: &mut ReadSession) -> Result<()> {
        self.common.read(r)?;
        self.platform_geometry = Self::read_subgraph(r, sess)?;
        self.avatar = Self::read_subgraph(r, sess)?;
        Ok(())
    }

    fn create(&self, universe: &mut Universe) -> Result<LiveRef> {
        let node = self.common.to_node(NodeKind::ViewPlatform {
            platform_geometry: None,
            avatar: None,
        });
        Ok(LiveRef::Node(universe.add_node(node)))
    }

    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let platform_geometry = self
            .platform_geometry
            .map(|id| ctx.node(id))
            .transpose()?;
        let avatar = self.avatar.map(|id| ctx.node(id)).transpose()?;
        let key = ctx.node(self.symbol)?;
        match &mut ctx.universe.nodes[key].kind {
            NodeKind::ViewPlatform {
                platform_geometry: pg,
                avatar: av,
            } => {
                *pg = platform_geometry;
                *av = avatar;
                Ok(())
            }
            _ => Err(OrreryError::WrongNodeKind { expected: "view platform" }),
        }
    }
}
