use super::*;
use crate::ui::{Id, Rect, Sense};

fn slot(key: u64, mid_y: i32) -> RowSlot {
    RowSlot { key, mid_y }
}

fn target(kind: NodeKind) -> Node {
    Node {
        id: Id::raw(99),
        rect: Rect::new(0, 0, 30, 10),
        layer: 0,
        z: 0,
        sense: Sense::DROP_TARGET,
        kind,
    }
}

fn handle(kind: NodeKind) -> Node {
    Node {
        id: Id::raw(1),
        rect: Rect::new(0, 0, 1, 1),
        layer: 0,
        z: 0,
        sense: Sense::DRAG_SOURCE,
        kind,
    }
}

#[test]
fn page_handle_yields_page_payload() {
    let rules = PanelDndRules;
    let payload = rules
        .payload_for_source(&handle(NodeKind::PageDragHandle { page: 7 }))
        .unwrap();
    assert_eq!(payload, DragPayload::Page { page: 7 });
}

#[test]
fn question_handle_carries_source_page() {
    let rules = PanelDndRules;
    let payload = rules
        .payload_for_source(&handle(NodeKind::QuestionDragHandle {
            question: 3,
            page: 7,
        }))
        .unwrap();
    assert_eq!(
        payload,
        DragPayload::Question {
            question: 3,
            from_page: 7
        }
    );
}

#[test]
fn rows_and_buttons_are_not_drag_sources() {
    let rules = PanelDndRules;
    assert!(rules
        .payload_for_source(&handle(NodeKind::PageRow { page: 7 }))
        .is_none());
    assert!(rules
        .payload_for_source(&handle(NodeKind::PageDeleteButton { page: 7 }))
        .is_none());
}

#[test]
fn pages_drop_only_on_the_page_list() {
    let rules = PanelDndRules;
    let payload = DragPayload::Page { page: 7 };
    assert!(rules.can_drop(&payload, &target(NodeKind::PageList)));
    assert!(!rules.can_drop(&payload, &target(NodeKind::QuestionList { page: 7 })));
}

#[test]
fn questions_drop_on_any_question_list() {
    let rules = PanelDndRules;
    let payload = DragPayload::Question {
        question: 3,
        from_page: 7,
    };
    assert!(rules.can_drop(&payload, &target(NodeKind::QuestionList { page: 7 })));
    assert!(rules.can_drop(&payload, &target(NodeKind::QuestionList { page: 8 })));
    assert!(!rules.can_drop(&payload, &target(NodeKind::PageList)));
}

#[test]
fn insert_index_empty_list_is_zero() {
    assert_eq!(insert_index(&[], 1, 5), 0);
}

#[test]
fn insert_index_before_first_midline() {
    let slots = [slot(10, 4), slot(11, 6), slot(12, 8)];
    assert_eq!(insert_index(&slots, 99, 3), 0);
}

#[test]
fn insert_index_between_midlines() {
    let slots = [slot(10, 4), slot(11, 6), slot(12, 8)];
    assert_eq!(insert_index(&slots, 99, 5), 1);
    assert_eq!(insert_index(&slots, 99, 7), 2);
}

#[test]
fn insert_index_past_last_midline_appends() {
    let slots = [slot(10, 4), slot(11, 6)];
    assert_eq!(insert_index(&slots, 99, 20), 2);
}

#[test]
fn dragged_row_is_excluded_from_the_count() {
    // Dragging row 10 just past its own position must not shift the result.
    let slots = [slot(10, 4), slot(11, 6), slot(12, 8)];
    assert_eq!(insert_index(&slots, 10, 5), 0);
    assert_eq!(insert_index(&slots, 10, 7), 1);
}

#[test]
fn rows_scrolled_above_the_viewport_still_count() {
    // Negative midlines belong to rows scrolled off the top.
    let slots = [slot(10, -3), slot(11, -1), slot(12, 2)];
    assert_eq!(insert_index(&slots, 99, 1), 2);
    assert_eq!(insert_index(&slots, 99, 3), 3);
}
