//! Transparency Sort Registry Tests

use std::cmp::Ordering;

use orrery::scene::{Node, NodeKind, Universe};
use orrery::sort::{SortAtom, TransparencySortRegistry};

fn atoms(universe: &mut Universe, depths: &[f32]) -> Vec<SortAtom> {
    depths
        .iter()
        .map(|&depth| SortAtom {
            shape: universe.add_node(Node::new(NodeKind::Shape { geometry: None })),
            depth,
        })
        .collect()
}

#[test]
fn default_ordering_is_back_to_front() {
    let mut universe = Universe::new();
    let mut registry = TransparencySortRegistry::new();
    let view = registry.register_view();

    let mut items = atoms(&mut universe, &[1.0, 5.0, 3.0]);
    registry.sort(view, &mut items);
    let depths: Vec<f32> = items.iter().map(|a| a.depth).collect();
    assert_eq!(depths, vec![5.0, 3.0, 1.0]);
}

#[test]
fn custom_comparator_overrides_default() {
    let mut universe = Universe::new();
    let mut registry = TransparencySortRegistry::new();
    let view = registry.register_view();
    assert!(registry.set_comparator(
        view,
        Box::new(|a, b| a.depth.total_cmp(&b.depth)), // front-to-back
    ));

    let mut items = atoms(&mut universe, &[1.0, 5.0, 3.0]);
    registry.sort(view, &mut items);
    let depths: Vec<f32> = items.iter().map(|a| a.depth).collect();
    assert_eq!(depths, vec![1.0, 3.0, 5.0]);
}

#[test]
fn removed_view_falls_back_to_default() {
    let mut universe = Universe::new();
    let mut registry = TransparencySortRegistry::new();
    let view = registry.register_view();
    registry.set_comparator(view, Box::new(|_, _| Ordering::Equal));
    registry.remove_view(view);
    assert_eq!(registry.view_count(), 0);

    // Installing on a dead view is refused.
    assert!(!registry.set_comparator(view, Box::new(|_, _| Ordering::Equal)));

    let mut items = atoms(&mut universe, &[2.0, 4.0]);
    registry.sort(view, &mut items);
    let depths: Vec<f32> = items.iter().map(|a| a.depth).collect();
    assert_eq!(depths, vec![4.0, 2.0]);
}
