use super::*;

fn node(id: u64, rect: Rect, layer: u8, sense: Sense) -> Node {
    Node {
        id: Id::raw(id),
        rect,
        layer,
        z: 0,
        sense,
        kind: NodeKind::Unknown,
    }
}

#[test]
fn push_assigns_increasing_z() {
    let mut tree = UiTree::new();
    tree.push(node(1, Rect::new(0, 0, 10, 10), 0, Sense::NONE));
    tree.push(node(2, Rect::new(0, 0, 10, 10), 0, Sense::NONE));

    assert_eq!(tree.nodes()[0].z, 0);
    assert_eq!(tree.nodes()[1].z, 1);
}

#[test]
fn hit_test_prefers_later_nodes_in_same_layer() {
    let mut tree = UiTree::new();
    tree.push(node(1, Rect::new(0, 0, 10, 10), 0, Sense::HOVER));
    tree.push(node(2, Rect::new(0, 0, 10, 10), 0, Sense::HOVER));

    let hit = tree.hit_test(Pos::new(5, 5)).unwrap();
    assert_eq!(hit.id, Id::raw(2));
}

#[test]
fn higher_layer_beats_higher_z() {
    let mut tree = UiTree::new();
    tree.push(node(1, Rect::new(0, 0, 10, 10), 1, Sense::HOVER));
    tree.push(node(2, Rect::new(0, 0, 10, 10), 0, Sense::HOVER));

    let hit = tree.hit_test(Pos::new(5, 5)).unwrap();
    assert_eq!(hit.id, Id::raw(1));
}

#[test]
fn sense_filter_skips_non_matching_nodes() {
    let mut tree = UiTree::new();
    tree.push(node(1, Rect::new(0, 0, 10, 10), 0, Sense::DROP_TARGET));
    tree.push(node(2, Rect::new(0, 0, 10, 10), 0, Sense::CLICK | Sense::HOVER));

    let hit = tree.hit_test_with_sense(Pos::new(3, 3), Sense::DROP_TARGET).unwrap();
    assert_eq!(hit.id, Id::raw(1));
    assert!(tree
        .hit_test_with_sense(Pos::new(3, 3), Sense::DRAG_SOURCE)
        .is_none());
}

#[test]
fn predicate_filter_skips_rejected_nodes() {
    let mut tree = UiTree::new();
    tree.push(node(1, Rect::new(0, 0, 10, 10), 0, Sense::DROP_TARGET));
    tree.push(node(2, Rect::new(0, 0, 10, 10), 0, Sense::DROP_TARGET));

    // Node 2 is on top but rejected; the search falls through to node 1.
    let hit = tree
        .hit_test_with_sense_where(Pos::new(3, 3), Sense::DROP_TARGET, |n| n.id == Id::raw(1))
        .unwrap();
    assert_eq!(hit.id, Id::raw(1));
}

#[test]
fn node_lookup_by_id() {
    let mut tree = UiTree::new();
    tree.push(node(7, Rect::new(0, 0, 1, 1), 0, Sense::NONE));
    assert!(tree.node(Id::raw(7)).is_some());
    assert!(tree.node(Id::raw(8)).is_none());

    tree.clear();
    assert!(tree.node(Id::raw(7)).is_none());
}

#[test]
fn sense_contains_is_bitwise() {
    let s = Sense::CLICK | Sense::HOVER;
    assert!(s.contains(Sense::CLICK));
    assert!(s.contains(Sense::HOVER));
    assert!(!s.contains(Sense::DRAG_SOURCE));
    assert!(s.contains(Sense::NONE));
}
