//! Drag-and-drop policy for the structure panel.
//!
//! The interaction runtime knows nothing about pages and questions; this
//! module decides which handles start a drag, which lists accept which
//! payload, and where a release lands in the target order.

use crate::ui::{DragDropRules, DragPayload, Node, NodeKind};
use crate::views::RowSlot;

pub struct PanelDndRules;

impl DragDropRules for PanelDndRules {
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
        match (payload, target.kind) {
            (DragPayload::Page { .. }, NodeKind::PageList) => true,
            // Questions may land in any page's list, including their own.
            (DragPayload::Question { .. }, NodeKind::QuestionList { .. }) => true,
            _ => false,
        }
    }
}

/// Insertion index for a release at `pointer_y`: the position of the first
/// row (dragged row excluded) whose midline lies below the pointer. The
/// result indexes the order as it looks after the dragged row is removed,
/// which is what the model's move operations expect.
pub fn insert_index(slots: &[RowSlot], dragged: u64, pointer_y: u16) -> usize {
    let mut idx = 0;
    for slot in slots {
        if slot.key == dragged {
            continue;
        }
        if (pointer_y as i32) < slot.mid_y {
            return idx;
        }
        idx += 1;
    }
    idx
}

#[cfg(test)]
#[path = "../../tests/unit/app/dnd.rs"]
mod tests;
