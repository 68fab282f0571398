use super::geom::Pos;
use super::id::Id;
use crate::ui::event::MouseButton;

/// What a drag session carries. Keys are raw slotmap key bits so the
/// interaction layer stays decoupled from the model types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPayload {
    Page { page: u64 },
    Question { question: u64, from_page: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    HoverChanged {
        from: Option<Id>,
        to: Option<Id>,
        pos: Pos,
    },
    Click {
        id: Id,
        button: MouseButton,
        pos: Pos,
    },
    DragStart {
        id: Id,
        pos: Pos,
    },
    DragMove {
        id: Id,
        pos: Pos,
        delta: (i16, i16),
    },
    /// Always emitted when a drag session ends, dropped or cancelled.
    DragEnd {
        id: Id,
        pos: Pos,
    },
    /// Emitted before DragEnd when the pointer was released over a
    /// compatible drop target.
    Drop {
        payload: DragPayload,
        target: Id,
        pos: Pos,
    },
}
