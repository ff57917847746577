use bitflags::bitflags;

bitflags! {
    /// Per-node permission bits gating live mutations.
    ///
    /// All bits are clear on a freshly created node. Bits are only enforced
    /// once a node is part of a live graph (its root attached to a locale);
    /// construction-time edits are always allowed. A refused mutation fails
    /// with [`OrreryError::CapabilityMissing`](crate::errors::OrreryError::CapabilityMissing)
    /// and leaves the graph untouched.
    ///
    /// Capability bits are ordinary node data and survive persistence.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// The node may be detached from its locale.
        const ALLOW_DETACH          = 1 << 0;
        /// The node's transform may be overwritten while live.
        const ALLOW_TRANSFORM_WRITE = 1 << 1;
        /// Children may be added to or removed from the node while live.
        const ALLOW_CHILDREN_WRITE  = 1 << 2;
    }
}

impl Capabilities {
    /// Capability set suitable for content that will be swapped in and out
    /// of a running universe.
    #[must_use]
    pub fn detachable() -> Self {
        Self::ALLOW_DETACH
    }
}
