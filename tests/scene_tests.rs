//! Live Scene-Graph Integration Tests
//!
//! Tests for:
//! - Hierarchy: add_child/remove_child rules and structural invariants
//! - Branch-graph attachment: attach/detach, capability gating, all-or-nothing
//! - Capability model: construction-time freedom, live enforcement
//! - Transforms: typed access, local-to-vworld accumulation
//! - HiResCoord arithmetic

use glam::{Mat4, Quat, Vec3};
use orrery::scene::{Capabilities, HiResCoord, Locale, Node, NodeKind, Universe};
use orrery::OrreryError;
use orrery::TcbKeyFrame;

fn branch(universe: &mut Universe, name: &str, capabilities: Capabilities) -> orrery::NodeKey {
    universe.add_node(Node::named(NodeKind::BranchGroup, name).with_capabilities(capabilities))
}

// ============================================================================
// Hierarchy Rules
// ============================================================================

#[test]
fn add_child_links_both_sides() {
    let mut universe = Universe::new();
    let parent = universe.add_node(Node::new(NodeKind::Group));
    let child = universe.add_node(Node::new(NodeKind::Group));

    universe.add_child(parent, child).unwrap();

    assert_eq!(universe.node(child).unwrap().parent(), Some(parent));
    assert!(universe.node(parent).unwrap().children().contains(&child));
}

#[test]
fn add_child_to_self_fails() {
    let mut universe = Universe::new();
    let node = universe.add_node(Node::new(NodeKind::Group));
    assert!(universe.add_child(node, node).is_err());
    assert_eq!(universe.node(node).unwrap().parent(), None);
}

#[test]
fn add_child_rejects_second_parent() {
    let mut universe = Universe::new();
    let a = universe.add_node(Node::new(NodeKind::Group));
    let b = universe.add_node(Node::new(NodeKind::Group));
    let child = universe.add_node(Node::new(NodeKind::Group));

    universe.add_child(a, child).unwrap();
    assert!(matches!(
        universe.add_child(b, child),
        Err(OrreryError::InvalidStructure(_))
    ));
}

#[test]
fn add_child_rejects_non_grouping_parent() {
    let mut universe = Universe::new();
    let shape = universe.add_node(Node::new(NodeKind::Shape { geometry: None }));
    let child = universe.add_node(Node::new(NodeKind::Group));
    assert!(matches!(
        universe.add_child(shape, child),
        Err(OrreryError::WrongNodeKind { .. })
    ));
}

#[test]
fn add_child_rejects_cycle() {
    let mut universe = Universe::new();
    let root = universe.add_node(Node::new(NodeKind::Group));
    let mid = universe.add_node(Node::new(NodeKind::Group));
    universe.add_child(root, mid).unwrap();

    // Linking the tree's root under its own descendant would close a cycle.
    assert!(matches!(
        universe.add_child(mid, root),
        Err(OrreryError::InvalidStructure(_))
    ));
}

#[test]
fn remove_child_unlinks() {
    let mut universe = Universe::new();
    let parent = universe.add_node(Node::new(NodeKind::Group));
    let child = universe.add_node(Node::new(NodeKind::Group));
    universe.add_child(parent, child).unwrap();

    universe.remove_child(parent, child).unwrap();
    assert_eq!(universe.node(child).unwrap().parent(), None);
    assert!(universe.node(parent).unwrap().children().is_empty());
}

// ============================================================================
// Branch-Graph Attachment
// ============================================================================

#[test]
fn attach_adds_to_locale_membership() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());

    universe.attach_branch_graph(locale, root).unwrap();
    assert_eq!(universe.branch_graphs(locale).unwrap(), &[root]);
    assert!(universe.is_live(root));
}

#[test]
fn attach_same_locale_twice_is_noop() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());

    universe.attach_branch_graph(locale, root).unwrap();
    universe.attach_branch_graph(locale, root).unwrap();
    assert_eq!(universe.branch_graphs(locale).unwrap().len(), 1);
}

#[test]
fn attach_rejects_non_branch_group() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let group = universe.add_node(Node::new(NodeKind::Group));
    assert!(matches!(
        universe.attach_branch_graph(locale, group),
        Err(OrreryError::WrongNodeKind { .. })
    ));
}

#[test]
fn attach_to_second_locale_fails() {
    let mut universe = Universe::new();
    let l1 = universe.add_locale(Locale::at_origin());
    let l2 = universe.add_locale(Locale::new(HiResCoord::from_meters(10.0, 0.0, 0.0)));
    let root = branch(&mut universe, "g", Capabilities::detachable());

    universe.attach_branch_graph(l1, root).unwrap();
    assert!(universe.attach_branch_graph(l2, root).is_err());
}

#[test]
fn detach_without_capability_fails_and_changes_nothing() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());
    universe.attach_branch_graph(locale, root).unwrap();

    assert!(matches!(
        universe.detach_branch_graph(root),
        Err(OrreryError::CapabilityMissing { .. })
    ));
    assert_eq!(universe.branch_graphs(locale).unwrap(), &[root]);
}

#[test]
fn detach_then_reattach_round_trips_membership() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::detachable());
    universe.attach_branch_graph(locale, root).unwrap();

    let was_at = universe.detach_branch_graph(root).unwrap();
    assert_eq!(was_at, locale);
    assert!(universe.branch_graphs(locale).unwrap().is_empty());
    assert!(!universe.is_live(root));

    universe.attach_branch_graph(was_at, root).unwrap();
    assert_eq!(universe.branch_graphs(locale).unwrap(), &[root]);
}

#[test]
fn detach_all_is_all_or_nothing() {
    let mut universe = Universe::new();
    let l1 = universe.add_locale(Locale::at_origin());
    let l2 = universe.add_locale(Locale::new(HiResCoord::from_meters(0.0, 5.0, 0.0)));
    let a = branch(&mut universe, "a", Capabilities::detachable());
    let b = branch(&mut universe, "b", Capabilities::empty()); // not detachable
    let c = branch(&mut universe, "c", Capabilities::detachable());
    universe.attach_branch_graph(l1, a).unwrap();
    universe.attach_branch_graph(l1, b).unwrap();
    universe.attach_branch_graph(l2, c).unwrap();

    assert!(matches!(
        universe.detach_all_graphs(),
        Err(OrreryError::CapabilityMissing { .. })
    ));
    // Nothing was partially detached.
    assert_eq!(universe.branch_graphs(l1).unwrap(), &[a, b]);
    assert_eq!(universe.branch_graphs(l2).unwrap(), &[c]);
}

#[test]
fn detach_all_then_attach_all_restores_membership() {
    let mut universe = Universe::new();
    let l1 = universe.add_locale(Locale::at_origin());
    let l2 = universe.add_locale(Locale::new(HiResCoord::from_meters(0.0, 0.0, 100.0)));
    let a = branch(&mut universe, "a", Capabilities::detachable());
    let b = branch(&mut universe, "b", Capabilities::detachable());
    let c = branch(&mut universe, "c", Capabilities::detachable());
    universe.attach_branch_graph(l1, a).unwrap();
    universe.attach_branch_graph(l1, b).unwrap();
    universe.attach_branch_graph(l2, c).unwrap();

    let pairs = universe.detach_all_graphs().unwrap();
    assert_eq!(pairs.len(), 3);
    assert!(universe.branch_graphs(l1).unwrap().is_empty());
    assert!(universe.branch_graphs(l2).unwrap().is_empty());

    universe.attach_all_graphs(&pairs).unwrap();
    assert_eq!(universe.branch_graphs(l1).unwrap(), &[a, b]);
    assert_eq!(universe.branch_graphs(l2).unwrap(), &[c]);
}

// ============================================================================
// Capability Model
// ============================================================================

#[test]
fn transform_write_is_free_before_attach() {
    let mut universe = Universe::new();
    let tg = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::IDENTITY,
    }));
    universe
        .set_transform(tg, Mat4::from_translation(Vec3::X))
        .unwrap();
}

#[test]
fn transform_write_on_live_node_needs_capability() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());
    let tg = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::IDENTITY,
    }));
    universe.add_child(root, tg).unwrap();
    universe.attach_branch_graph(locale, root).unwrap();

    assert!(matches!(
        universe.set_transform(tg, Mat4::from_translation(Vec3::X)),
        Err(OrreryError::CapabilityMissing { .. })
    ));

    // With the bit granted before attachment, the same write succeeds.
    let root2 = branch(&mut universe, "g2", Capabilities::empty());
    let tg2 = universe.add_node(
        Node::new(NodeKind::TransformGroup {
            transform: Mat4::IDENTITY,
        })
        .with_capabilities(Capabilities::ALLOW_TRANSFORM_WRITE),
    );
    universe.add_child(root2, tg2).unwrap();
    universe.attach_branch_graph(locale, root2).unwrap();
    universe
        .set_transform(tg2, Mat4::from_translation(Vec3::Y))
        .unwrap();
}

#[test]
fn capabilities_freeze_when_live() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());

    universe.set_capabilities(root, Capabilities::detachable()).unwrap();
    universe.attach_branch_graph(locale, root).unwrap();
    assert!(matches!(
        universe.set_capabilities(root, Capabilities::empty()),
        Err(OrreryError::InvalidStructure(_))
    ));
}

#[test]
fn live_child_list_edits_need_capability() {
    let mut universe = Universe::new();
    let locale = universe.add_locale(Locale::at_origin());
    let root = branch(&mut universe, "g", Capabilities::empty());
    universe.attach_branch_graph(locale, root).unwrap();

    let extra = universe.add_node(Node::new(NodeKind::Group));
    assert!(matches!(
        universe.add_child(root, extra),
        Err(OrreryError::CapabilityMissing { .. })
    ));
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn transform_access_requires_transform_group() {
    let mut universe = Universe::new();
    let group = universe.add_node(Node::new(NodeKind::Group));
    assert!(matches!(
        universe.transform(group),
        Err(OrreryError::WrongNodeKind { .. })
    ));
}

#[test]
fn local_to_vworld_accumulates_ancestors() {
    let mut universe = Universe::new();
    let outer = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
    }));
    let inner = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
    }));
    let leaf = universe.add_node(Node::new(NodeKind::Shape { geometry: None }));
    universe.add_child(outer, inner).unwrap();
    universe.add_child(inner, leaf).unwrap();

    let m = universe.local_to_vworld(leaf).unwrap();
    assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 0.0));
}

// ============================================================================
// Interpolators Driving Transforms
// ============================================================================

#[test]
fn apply_interpolator_moves_target() {
    let mut universe = Universe::new();
    let target = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::IDENTITY,
    }));
    let interpolator = universe.add_node(Node::new(NodeKind::TcbInterpolator {
        target: Some(target),
        axis: Mat4::IDENTITY,
        keyframes: vec![
            TcbKeyFrame::linear(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE),
            TcbKeyFrame::linear(1.0, Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
        ],
    }));

    universe.apply_interpolator(interpolator, 0.25).unwrap();
    let translation = universe.transform(target).unwrap().w_axis.truncate();
    assert!((translation - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn apply_interpolator_respects_axis() {
    let mut universe = Universe::new();
    let target = universe.add_node(Node::new(NodeKind::TransformGroup {
        transform: Mat4::IDENTITY,
    }));
    // A 90° rotation about Z carries motion along +X into +Y.
    let interpolator = universe.add_node(Node::new(NodeKind::TcbInterpolator {
        target: Some(target),
        axis: Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2),
        keyframes: vec![
            TcbKeyFrame::linear(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE),
            TcbKeyFrame::linear(1.0, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
        ],
    }));

    universe.apply_interpolator(interpolator, 1.0).unwrap();
    let translation = universe.transform(target).unwrap().w_axis.truncate();
    assert!((translation - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
}

// ============================================================================
// HiResCoord
// ============================================================================

#[test]
fn hires_from_meters_places_words() {
    let coord = HiResCoord::from_meters(1.5, 0.0, 0.0);
    assert_eq!(coord.x[3], 1);
    assert_eq!(coord.x[4], i32::MIN); // 0.5 in the first fraction word
    assert_eq!(coord.y, [0; 8]);
}

#[test]
fn hires_meter_round_trip() {
    let coord = HiResCoord::from_meters(123.25, -0.5, 1e6);
    let meters = coord.to_meters();
    assert!((meters.x - 123.25).abs() < 1e-6);
    assert!((meters.y + 0.5).abs() < 1e-6);
    assert!((meters.z - 1e6).abs() < 1e-3);
}

#[test]
fn hires_add_sub_negate() {
    let a = HiResCoord::from_meters(3.0, -2.0, 0.25);
    let b = HiResCoord::from_meters(1.0, 5.0, 0.75);

    let sum = a.add(&b).to_meters();
    assert!((sum.x - 4.0).abs() < 1e-6);
    assert!((sum.y - 3.0).abs() < 1e-6);
    assert!((sum.z - 1.0).abs() < 1e-6);

    assert_eq!(a.sub(&b).add(&b), a);
    assert_eq!(a.negate().negate(), a);
}

#[test]
fn hires_distance() {
    let a = HiResCoord::from_meters(0.0, 0.0, 0.0);
    let b = HiResCoord::from_meters(3.0, 4.0, 0.0);
    assert!((a.distance(&b) - 5.0).abs() < 1e-6);
}
