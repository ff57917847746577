//! Live retained-mode scene graph.
//!
//! Manages the universe hierarchy and its components:
//! - Universe: top-level container owning all live nodes and locales
//! - Locale: high-resolution coordinate origin that branch graphs attach to
//! - Node: scene node (typed kind, capabilities, parent/child links)
//! - Geometry: shared mesh data referenced by shape nodes
//! - HiResCoord: 256-bit fixed-point world coordinate

pub mod capability;
pub mod geometry;
pub mod hires;
pub mod locale;
pub mod node;
pub mod universe;

pub use capability::Capabilities;
pub use geometry::Geometry;
pub use hires::HiResCoord;
pub use locale::Locale;
pub use node::{Node, NodeKind};
pub use universe::Universe;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a live node in a [`Universe`].
    pub struct NodeKey;
    /// Handle to a shared geometry component.
    pub struct GeometryKey;
    /// Handle to a locale.
    pub struct LocaleKey;
}
