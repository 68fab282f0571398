use super::*;
use crate::ui::event::{InputEvent, KeyModifiers, MouseButton, MouseEventKind};
use crate::ui::geom::Rect;
use crate::ui::id::Id;
use crate::ui::scene::{Node, NodeKind, Sense, UiTree};
use crossterm::event::MouseEvent;

fn node(id: u64, rect: Rect, sense: Sense, kind: NodeKind) -> Node {
    Node {
        id: Id::raw(id),
        rect,
        layer: 0,
        z: 0,
        sense,
        kind,
    }
}

fn mouse(kind: MouseEventKind, x: u16, y: u16) -> InputEvent {
    InputEvent::Mouse(MouseEvent {
        kind,
        column: x,
        row: y,
        modifiers: KeyModifiers::NONE,
    })
}

#[derive(Debug, Clone, Copy, Default)]
struct TestRules;

impl DragDropRules for TestRules {
    fn payload_for_source(&self, source: &Node) -> Option<DragPayload> {
        match source.kind {
            NodeKind::PageDragHandle { page } => Some(DragPayload::Page { page }),
            NodeKind::QuestionDragHandle { question, page } => Some(DragPayload::Question {
                question,
                from_page: page,
            }),
            _ => None,
        }
    }

    fn can_drop(&self, payload: &DragPayload, target: &Node) -> bool {
        matches!(
            (payload, target.kind),
            (DragPayload::Page { .. }, NodeKind::PageList)
                | (DragPayload::Question { .. }, NodeKind::QuestionList { .. })
        )
    }
}

const TEST_RULES: TestRules = TestRules;

fn on_input(rt: &mut UiRuntime, input: &InputEvent, tree: &UiTree) -> UiRuntimeOutput {
    rt.on_input(input, tree, &TEST_RULES)
}

#[test]
fn hover_change_triggers_redraw() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 10, 10),
        Sense::HOVER,
        NodeKind::Unknown,
    ));

    let mut rt = UiRuntime::new();
    let out = on_input(&mut rt, &mouse(MouseEventKind::Moved, 5, 5), &tree);

    assert!(out.needs_redraw);
    assert!(matches!(
        out.events.as_slice(),
        [UiEvent::HoverChanged {
            from: None,
            to: Some(_),
            ..
        }]
    ));
    assert_eq!(rt.hovered(), Some(Id::raw(1)));
}

#[test]
fn left_click_emits_click() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 10, 10),
        Sense::CLICK | Sense::HOVER,
        NodeKind::AddPageButton,
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
        &tree,
    );
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Up(MouseButton::Left), 1, 1),
        &tree,
    );

    assert!(out.events.iter().any(|e| matches!(
        e,
        UiEvent::Click {
            id,
            button: MouseButton::Left,
            ..
        } if *id == Id::raw(1)
    )));
}

#[test]
fn drag_threshold_prevents_accidental_drag() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 20, 20),
        Sense::CLICK | Sense::HOVER | Sense::DRAG_SOURCE,
        NodeKind::PageDragHandle { page: 9 },
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 0, 0),
        &tree,
    );

    // Small move: dist == 1 -> no drag.
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 1, 0),
        &tree,
    );
    assert!(!out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragStart { .. })));

    // Move >= threshold: dist == 2 -> drag start.
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 2, 0),
        &tree,
    );
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragStart { .. })));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragMove { .. })));
    assert_eq!(rt.capture(), Some(Id::raw(1)));

    // Release ends drag and clears capture.
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Up(MouseButton::Left), 2, 0),
        &tree,
    );
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragEnd { .. })));
    assert_eq!(rt.capture(), None);
    assert!(!rt.is_dragging());
}

#[test]
fn non_draggable_node_never_starts_a_drag() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 20, 20),
        Sense::CLICK | Sense::HOVER,
        NodeKind::PageRow { page: 9 },
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 0, 0),
        &tree,
    );
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 5, 0),
        &tree,
    );

    assert!(out.events.is_empty());
    assert!(!rt.is_dragging());
}

#[test]
fn drop_on_compatible_target_precedes_drag_end() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 5, 5),
        Sense::HOVER | Sense::DRAG_SOURCE,
        NodeKind::PageDragHandle { page: 9 },
    ));
    tree.push(node(
        2,
        Rect::new(10, 0, 10, 10),
        Sense::DROP_TARGET,
        NodeKind::PageList,
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
        &tree,
    );
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 3, 1),
        &tree,
    );
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 12, 1),
        &tree,
    );
    assert_eq!(rt.drag_over(), Some(Id::raw(2)));

    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Up(MouseButton::Left), 12, 1),
        &tree,
    );

    let drop_at = out
        .events
        .iter()
        .position(|e| matches!(e, UiEvent::Drop { target, payload, .. }
            if *target == Id::raw(2) && matches!(payload, DragPayload::Page { page: 9 })));
    let end_at = out
        .events
        .iter()
        .position(|e| matches!(e, UiEvent::DragEnd { .. }));
    assert!(drop_at.unwrap() < end_at.unwrap());
}

#[test]
fn release_outside_target_cancels_without_drop() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 5, 5),
        Sense::HOVER | Sense::DRAG_SOURCE,
        NodeKind::QuestionDragHandle { question: 4, page: 9 },
    ));
    tree.push(node(
        2,
        Rect::new(10, 0, 10, 10),
        Sense::DROP_TARGET,
        NodeKind::QuestionList { page: 9 },
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
        &tree,
    );
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 3, 1),
        &tree,
    );
    // Release in the gap between source and target.
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Up(MouseButton::Left), 7, 1),
        &tree,
    );

    assert!(!out.events.iter().any(|e| matches!(e, UiEvent::Drop { .. })));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragEnd { .. })));
}

#[test]
fn incompatible_target_is_skipped_for_topmost_compatible() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 5, 5),
        Sense::HOVER | Sense::DRAG_SOURCE,
        NodeKind::PageDragHandle { page: 9 },
    ));
    // Compatible target below, incompatible one stacked on top.
    tree.push(node(
        2,
        Rect::new(10, 0, 10, 10),
        Sense::DROP_TARGET,
        NodeKind::PageList,
    ));
    tree.push(node(
        3,
        Rect::new(10, 0, 10, 10),
        Sense::DROP_TARGET,
        NodeKind::QuestionList { page: 9 },
    ));

    let mut rt = UiRuntime::new();
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 1, 1),
        &tree,
    );
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 3, 1),
        &tree,
    );
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 12, 1),
        &tree,
    );

    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Up(MouseButton::Left), 12, 1),
        &tree,
    );
    assert!(out.events.iter().any(|e| matches!(
        e,
        UiEvent::Drop { target, .. } if *target == Id::raw(2)
    )));
}

#[test]
fn custom_threshold_is_respected() {
    let mut tree = UiTree::new();
    tree.push(node(
        1,
        Rect::new(0, 0, 20, 20),
        Sense::HOVER | Sense::DRAG_SOURCE,
        NodeKind::PageDragHandle { page: 1 },
    ));

    let mut rt = UiRuntime::with_threshold(5);
    let _ = on_input(
        &mut rt,
        &mouse(MouseEventKind::Down(MouseButton::Left), 0, 0),
        &tree,
    );
    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 4, 0),
        &tree,
    );
    assert!(!out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragStart { .. })));

    let out = on_input(
        &mut rt,
        &mouse(MouseEventKind::Drag(MouseButton::Left), 5, 0),
        &tree,
    );
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::DragStart { .. })));
}
