use glam::Mat4;

use crate::animation::TcbKeyFrame;
use crate::scene::capability::Capabilities;
use crate::scene::{GeometryKey, NodeKey};

/// A live scene node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: handle to the parent node (None for branch-graph roots)
/// - `children`: list of child node handles
///
/// Hierarchy links are maintained by [`Universe`](crate::scene::Universe)
/// methods which keep both sides in sync; the fields are crate-private to
/// prevent one-sided edits.
///
/// # Capabilities
///
/// Mutations through the public API are gated by [`Capabilities`] bits.
/// The bits are ordinary data: they are serialized with the node and
/// survive a persistence round trip.
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional display name, used for lookup after reconstruction.
    pub name: Option<String>,
    /// Permission bits for live mutations.
    pub capabilities: Capabilities,
    /// What the node is; kind-specific fields live here.
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

/// The typed payload of a [`Node`].
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node.
    Group,
    /// Detachable subtree root; the only kind a locale will accept.
    BranchGroup,
    /// Grouping node that applies a spatial transform to its subtree.
    TransformGroup {
        /// Local transform, column-major 4x4.
        transform: Mat4,
    },
    /// Leaf referencing a shared [`Geometry`](crate::scene::Geometry).
    Shape {
        geometry: Option<GeometryKey>,
    },
    /// Attachment point for a viewer: optional decorative geometry for the
    /// platform itself and an optional avatar subtree.
    ViewPlatform {
        platform_geometry: Option<NodeKey>,
        avatar: Option<NodeKey>,
    },
    /// Keyframe path interpolator driving a target transform group.
    ///
    /// The sampled translation/rotation/scale is applied in the coordinate
    /// system given by `axis`: `axis * TRS * axis.inverse()`.
    TcbInterpolator {
        target: Option<NodeKey>,
        axis: Mat4,
        keyframes: Vec<TcbKeyFrame>,
    },
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            capabilities: Capabilities::empty(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(kind: NodeKind, name: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            ..Self::new(kind)
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// True for kinds that may own children.
    #[must_use]
    pub fn is_grouping(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Group | NodeKind::BranchGroup | NodeKind::TransformGroup { .. }
        )
    }
}
