use glam::Mat4;

use crate::animation::{InterpolationMode, TcbKeyFrame};
use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::states::{CommonState, NodeState};
use crate::persist::symbols::{LiveRef, SymbolId};
use crate::scene::node::{Node, NodeKind};
use crate::scene::{NodeKey, Universe};

/// State record for keyframe path interpolators.
///
/// The target is a non-owning reference: only its symbol ID goes on the
/// wire, and the ID may point forward to a record later in the stream. The
/// build phase resolves it once the target exists and checks that it is a
/// transform group.
pub(crate) struct TcbInterpolatorState {
    symbol: SymbolId,
    common: CommonState,
    live_target: Option<NodeKey>,
    target: Option<SymbolId>,
    axis: Mat4,
    keyframes: Vec<TcbKeyFrame>,
}

impl TcbInterpolatorState {
    pub fn capture(node: &Node, symbol: SymbolId) -> Self {
        let (live_target, axis, keyframes) = match &node.kind {
            NodeKind::TcbInterpolator {
                target,
                axis,
                keyframes,
            } => (*target, *axis, keyframes.clone()),
            _ => (None, Mat4::IDENTITY, Vec::new()),
        };
        Self {
            symbol,
            common: CommonState::capture(node),
            live_target,
            target: None,
            axis,
            keyframes,
        }
    }

    pub fn blank(symbol: SymbolId) -> Self {
        Self {
            symbol,
            common: CommonState::default(),
            live_target: None,
            target: None,
            axis: Mat4::IDENTITY,
            keyframes: Vec::new(),
        }
    }
}

impl NodeState for TcbInterpolatorState {
    fn write_params(&self, w: &mut SceneWriter<'_>, sess: &mut WriteSession<'_>) -> Result<()> {
        self.common.write(w)?;
        match self.live_target {
            Some(key) => {
                w.write_bool(true)?;
                let id = sess.reference(key);
                w.write_u32(id.raw())?;
            }
            None => w.write_bool(false)?,
        }
        w.write_mat4(&self.axis)?;
        w.write_len(self.keyframes.len())?;
        for frame in &self.keyframes {
            write_keyframe(w, frame)?;
        }
        Ok(())
    }

    fn read_params(&mut self, r: &mut SceneReader<'_>, _sess: &mut ReadSession) -> Result<()> {
        self.common.read(r)?;
        if r.read_bool()? {
            self.target = Some(SymbolId(r.read_u32()?));
        }
        self.axis = r.read_mat4()?;
        let count = r.read_len()?;
        self.keyframes.reserve(count.min(1 << 16));
        for _ in 0..count {
            self.keyframes.push(read_keyframe(r)?);
        }
        Ok(())
    }

    fn create(&self, universe: &mut Universe) -> Result<LiveRef> {
        let node = self.common.to_node(NodeKind::TcbInterpolator {
            target: None,
            axis: self.axis,
            keyframes: self.keyframes.clone(),
        });
        Ok(LiveRef::Node(universe.add_node(node)))
    }

    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<()> {
        let Some(id) = self.target else {
            return Ok(());
        };
        let target = ctx.node(id)?;
        if !matches!(
            ctx.universe.nodes[target].kind,
            NodeKind::TransformGroup { .. }
        ) {
            return Err(OrreryError::WrongNodeKind { expected: "transform group" });
        }
        let key = ctx.node(self.symbol)?;
        match &mut ctx.universe.nodes[key].kind {
            NodeKind::TcbInterpolator { target: slot, .. } => {
                *slot = Some(target);
                Ok(())
            }
            _ => Err(OrreryError::WrongNodeKind { expected: "interpolator" }),
        }
    }
}

// Keyframes are written in fixed field order: knot, mode, position,
// orientation, scale, tension, continuity, bias.

fn write_keyframe(w: &mut SceneWriter<'_>, frame: &TcbKeyFrame) -> Result<()> {
    w.write_f32(frame.knot)?;
    w.write_u8(match frame.mode {
        InterpolationMode::Spline => 0,
        InterpolationMode::Linear => 1,
    })?;
    w.write_vec3(frame.position)?;
    w.write_quat(frame.orientation)?;
    w.write_vec3(frame.scale)?;
    w.write_f32(frame.tension)?;
    w.write_f32(frame.continuity)?;
    w.write_f32(frame.bias)
}

fn read_keyframe(r: &mut SceneReader<'_>) -> Result<TcbKeyFrame> {
    let knot = r.read_f32()?;
    let mode = match r.read_u8()? {
        0 => InterpolationMode::Spline,
        1 => InterpolationMode::Linear,
        other => {
            return Err(OrreryError::CorruptStream(format!(
                "unknown interpolation mode {other:#04x}"
            )));
        }
    };
    Ok(TcbKeyFrame {
        knot,
        mode,
        position: r.read_vec3()?,
        orientation: r.read_quat()?,
        scale: r.read_vec3()?,
        tension: r.read_f32()?,
        continuity: r.read_f32()?,
        bias: r.read_f32()?,
    })
}
