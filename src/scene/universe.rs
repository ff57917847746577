use glam::Mat4;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::errors::{OrreryError, Result};
use crate::scene::capability::Capabilities;
use crate::scene::geometry::Geometry;
use crate::scene::locale::Locale;
use crate::scene::node::{Node, NodeKind};
use crate::scene::{GeometryKey, LocaleKey, NodeKey};

/// Top-level container for a live scene graph.
///
/// A universe owns every node, geometry, and locale. Branch graphs (subtrees
/// rooted at a [`NodeKind::BranchGroup`]) become *live* when attached to a
/// locale; capability bits are enforced on live content only, so graphs can
/// be assembled freely before attachment.
///
/// The universe is the unit of persistence: the whole container round-trips
/// through [`persist::save_universe`](crate::persist::save_universe) and
/// [`persist::load_universe`](crate::persist::load_universe).
pub struct Universe {
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    pub(crate) geometries: SlotMap<GeometryKey, Geometry>,
    pub(crate) locales: SlotMap<LocaleKey, Locale>,
    /// Locale ordering, so traversal and serialization are deterministic.
    pub(crate) locale_order: Vec<LocaleKey>,
    /// Which locale each live branch-graph root is attached to.
    attached: FxHashMap<NodeKey, LocaleKey>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            geometries: SlotMap::with_key(),
            locales: SlotMap::with_key(),
            locale_order: Vec::new(),
            attached: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Locales
    // ========================================================================

    pub fn add_locale(&mut self, locale: Locale) -> LocaleKey {
        let key = self.locales.insert(locale);
        self.locale_order.push(key);
        key
    }

    #[must_use]
    pub fn locale(&self, key: LocaleKey) -> Option<&Locale> {
        self.locales.get(key)
    }

    /// All locales, in creation order.
    pub fn locales(&self) -> impl Iterator<Item = (LocaleKey, &Locale)> {
        self.locale_order
            .iter()
            .filter_map(|&k| self.locales.get(k).map(|l| (k, l)))
    }

    #[must_use]
    pub fn locale_count(&self) -> usize {
        self.locale_order.len()
    }

    /// Roots of the branch graphs attached to `locale`, in attachment order.
    pub fn branch_graphs(&self, locale: LocaleKey) -> Result<&[NodeKey]> {
        self.locales
            .get(locale)
            .map(|l| l.branch_graphs.as_slice())
            .ok_or(OrreryError::LocaleNotFound)
    }

    // ========================================================================
    // Nodes & Geometry
    // ========================================================================

    pub fn add_node(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryKey {
        self.geometries.insert(geometry)
    }

    #[must_use]
    pub fn geometry(&self, key: GeometryKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Replaces a node's capability bits.
    ///
    /// Capabilities are frozen once the node is live; grant everything a
    /// mutation will need before attaching the graph.
    pub fn set_capabilities(&mut self, key: NodeKey, capabilities: Capabilities) -> Result<()> {
        if !self.nodes.contains_key(key) {
            return Err(OrreryError::NodeNotFound);
        }
        if self.is_live(key) {
            return Err(OrreryError::InvalidStructure(
                "capabilities are frozen while live",
            ));
        }
        self.nodes[key].capabilities = capabilities;
        Ok(())
    }

    /// Finds the first node carrying `name`, in unspecified arena order.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(k, _)| k)
    }

    /// True once the node's root is attached to a locale.
    #[must_use]
    pub fn is_live(&self, key: NodeKey) -> bool {
        self.attached.contains_key(&self.root_of(key))
    }

    fn root_of(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        while let Some(node) = self.nodes.get(current)
            && let Some(parent) = node.parent
        {
            current = parent;
        }
        current
    }

    fn require_capability(
        &self,
        key: NodeKey,
        bit: Capabilities,
        capability: &'static str,
        operation: &'static str,
    ) -> Result<()> {
        let node = self.nodes.get(key).ok_or(OrreryError::NodeNotFound)?;
        if self.is_live(key) && !node.capabilities.contains(bit) {
            return Err(OrreryError::CapabilityMissing {
                capability,
                operation,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Links `child` under `parent`, keeping both sides in sync.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if parent == child {
            log::warn!("Cannot attach node to itself!");
            return Err(OrreryError::InvalidStructure("node cannot be its own child"));
        }
        {
            let parent_node = self.nodes.get(parent).ok_or(OrreryError::NodeNotFound)?;
            if !parent_node.is_grouping() {
                return Err(OrreryError::WrongNodeKind { expected: "grouping node" });
            }
            let child_node = self.nodes.get(child).ok_or(OrreryError::NodeNotFound)?;
            if child_node.parent.is_some() {
                return Err(OrreryError::InvalidStructure("child already has a parent"));
            }
        }
        if self.attached.contains_key(&child) {
            return Err(OrreryError::InvalidStructure(
                "child is attached to a locale",
            ));
        }
        // Re-parenting an ancestor under its own descendant would close a cycle.
        if self.root_of(parent) == child {
            return Err(OrreryError::InvalidStructure("child is an ancestor of parent"));
        }
        self.require_capability(
            parent,
            Capabilities::ALLOW_CHILDREN_WRITE,
            "ALLOW_CHILDREN_WRITE",
            "add_child",
        )?;

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Unlinks `child` from `parent`. The child remains in the universe.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        self.require_capability(
            parent,
            Capabilities::ALLOW_CHILDREN_WRITE,
            "ALLOW_CHILDREN_WRITE",
            "remove_child",
        )?;
        let Some(pos) = self
            .nodes
            .get(parent)
            .ok_or(OrreryError::NodeNotFound)?
            .children
            .iter()
            .position(|&c| c == child)
        else {
            return Err(OrreryError::InvalidStructure("node is not a child of parent"));
        };
        self.nodes[parent].children.remove(pos);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        Ok(())
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Reads the local transform of a transform group.
    pub fn transform(&self, key: NodeKey) -> Result<Mat4> {
        let node = self.nodes.get(key).ok_or(OrreryError::NodeNotFound)?;
        match node.kind {
            NodeKind::TransformGroup { transform } => Ok(transform),
            _ => Err(OrreryError::WrongNodeKind { expected: "transform group" }),
        }
    }

    /// Overwrites the local transform of a transform group.
    ///
    /// Requires [`Capabilities::ALLOW_TRANSFORM_WRITE`] while the node is
    /// live.
    pub fn set_transform(&mut self, key: NodeKey, transform: Mat4) -> Result<()> {
        self.require_capability(
            key,
            Capabilities::ALLOW_TRANSFORM_WRITE,
            "ALLOW_TRANSFORM_WRITE",
            "set_transform",
        )?;
        match &mut self.nodes[key].kind {
            NodeKind::TransformGroup { transform: t } => {
                *t = transform;
                Ok(())
            }
            _ => Err(OrreryError::WrongNodeKind { expected: "transform group" }),
        }
    }

    /// Accumulated transform from the node's coordinate system to its
    /// locale's, the product of every transform group on the ancestor path.
    pub fn local_to_vworld(&self, key: NodeKey) -> Result<Mat4> {
        if !self.nodes.contains_key(key) {
            return Err(OrreryError::NodeNotFound);
        }
        let mut accumulated = Mat4::IDENTITY;
        let mut current = Some(key);
        while let Some(k) = current {
            let node = &self.nodes[k];
            if let NodeKind::TransformGroup { transform } = node.kind {
                accumulated = transform * accumulated;
            }
            current = node.parent;
        }
        Ok(accumulated)
    }

    // ========================================================================
    // Branch-Graph Attachment
    // ========================================================================

    /// Attaches a branch graph to a locale, making its subtree live.
    ///
    /// Attaching a root that is already attached to the same locale is a
    /// no-op. The root must be a [`NodeKind::BranchGroup`] without a parent.
    pub fn attach_branch_graph(&mut self, locale: LocaleKey, root: NodeKey) -> Result<()> {
        let node = self.nodes.get(root).ok_or(OrreryError::NodeNotFound)?;
        if !matches!(node.kind, NodeKind::BranchGroup) {
            return Err(OrreryError::WrongNodeKind { expected: "branch group" });
        }
        if node.parent.is_some() {
            return Err(OrreryError::InvalidStructure(
                "branch-graph root has a parent",
            ));
        }
        match self.attached.get(&root) {
            Some(&current) if current == locale => return Ok(()),
            Some(_) => {
                return Err(OrreryError::InvalidStructure(
                    "branch graph is attached to another locale",
                ));
            }
            None => {}
        }
        let locale_data = self.locales.get_mut(locale).ok_or(OrreryError::LocaleNotFound)?;
        locale_data.branch_graphs.push(root);
        self.attached.insert(root, locale);
        Ok(())
    }

    /// Detaches a branch graph from whichever locale holds it.
    ///
    /// Requires [`Capabilities::ALLOW_DETACH`] on the root. Returns the
    /// locale the graph was attached to, so it can be re-attached later.
    pub fn detach_branch_graph(&mut self, root: NodeKey) -> Result<LocaleKey> {
        let node = self.nodes.get(root).ok_or(OrreryError::NodeNotFound)?;
        let Some(&locale) = self.attached.get(&root) else {
            return Err(OrreryError::InvalidStructure(
                "branch graph is not attached",
            ));
        };
        if !node.capabilities.contains(Capabilities::ALLOW_DETACH) {
            return Err(OrreryError::CapabilityMissing {
                capability: "ALLOW_DETACH",
                operation: "detach_branch_graph",
            });
        }
        let locale_data = self.locales.get_mut(locale).ok_or(OrreryError::LocaleNotFound)?;
        if let Some(pos) = locale_data.branch_graphs.iter().position(|&b| b == root) {
            locale_data.branch_graphs.remove(pos);
        }
        self.attached.remove(&root);
        Ok(locale)
    }

    /// Detaches every branch graph in the universe.
    ///
    /// All-or-nothing: if any root lacks [`Capabilities::ALLOW_DETACH`],
    /// nothing is detached. Returns the `(locale, root)` pairs in locale and
    /// attachment order, suitable for [`Universe::attach_all_graphs`].
    pub fn detach_all_graphs(&mut self) -> Result<Vec<(LocaleKey, NodeKey)>> {
        let mut pairs = Vec::new();
        for &locale in &self.locale_order {
            for &root in &self.locales[locale].branch_graphs {
                let node = self.nodes.get(root).ok_or(OrreryError::NodeNotFound)?;
                if !node.capabilities.contains(Capabilities::ALLOW_DETACH) {
                    return Err(OrreryError::CapabilityMissing {
                        capability: "ALLOW_DETACH",
                        operation: "detach_all_graphs",
                    });
                }
                pairs.push((locale, root));
            }
        }
        for &(locale, root) in &pairs {
            let locale_data = &mut self.locales[locale];
            if let Some(pos) = locale_data.branch_graphs.iter().position(|&b| b == root) {
                locale_data.branch_graphs.remove(pos);
            }
            self.attached.remove(&root);
        }
        log::debug!("detached {} branch graphs", pairs.len());
        Ok(pairs)
    }

    /// Re-attaches branch graphs previously returned by
    /// [`Universe::detach_all_graphs`].
    pub fn attach_all_graphs(&mut self, pairs: &[(LocaleKey, NodeKey)]) -> Result<()> {
        for &(locale, root) in pairs {
            self.attach_branch_graph(locale, root)?;
        }
        Ok(())
    }

    // ========================================================================
    // Interpolators
    // ========================================================================

    /// Samples an interpolator at `alpha` in `[0, 1]` and writes the result
    /// to its target transform group as `axis * TRS * axis⁻¹`.
    ///
    /// The target write goes through [`Universe::set_transform`], so a live
    /// target needs [`Capabilities::ALLOW_TRANSFORM_WRITE`].
    pub fn apply_interpolator(&mut self, key: NodeKey, alpha: f32) -> Result<()> {
        let node = self.nodes.get(key).ok_or(OrreryError::NodeNotFound)?;
        let NodeKind::TcbInterpolator {
            target,
            axis,
            ref keyframes,
        } = node.kind
        else {
            return Err(OrreryError::WrongNodeKind { expected: "interpolator" });
        };
        let Some(target) = target else {
            return Err(OrreryError::InvalidStructure("interpolator has no target"));
        };
        let sample = crate::animation::sample_path(keyframes, alpha)?;
        let trs = Mat4::from_scale_rotation_translation(
            sample.scale,
            sample.orientation,
            sample.position,
        );
        self.set_transform(target, axis * trs * axis.inverse())
    }
}
