use super::geom::{Pos, Rect};
use super::id::Id;
use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Sense(u16);

impl Sense {
    pub const NONE: Self = Self(0);
    pub const HOVER: Self = Self(1 << 0);
    pub const CLICK: Self = Self(1 << 1);
    pub const DRAG_SOURCE: Self = Self(1 << 2);
    pub const DROP_TARGET: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Sense {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Sense {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Every interactive element of the structure panel. Page/question keys are
/// raw slotmap bits (see `DragPayload`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Unknown,
    PanelToggle,
    AddPageButton,
    AddQuestionButton,
    /// The page list as a whole: drop target for page payloads.
    PageList,
    /// One page's question list: drop target for question payloads,
    /// including questions dragged from another page.
    QuestionList { page: u64 },
    PageRow { page: u64 },
    PageDragHandle { page: u64 },
    PageCollapseToggle { page: u64 },
    PageDeleteButton { page: u64 },
    PageDuplicateButton { page: u64 },
    QuestionRow { question: u64, page: u64 },
    QuestionDragHandle { question: u64, page: u64 },
    QuestionDeleteButton { question: u64 },
    QuestionDuplicateButton { question: u64 },
    DialogCancel,
    DialogConfirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: Id,
    pub rect: Rect,
    pub layer: u8,
    pub z: u32,
    pub sense: Sense,
    pub kind: NodeKind,
}

impl Node {
    pub fn contains(&self, p: Pos) -> bool {
        self.rect.contains(p)
    }
}

#[derive(Clone, Debug, Default)]
pub struct UiTree {
    nodes: Vec<Node>,
}

impl UiTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn push(&mut self, mut node: Node) {
        // Default z-order: insertion order within the same layer.
        if node.z == 0 {
            node.z = self.nodes.len() as u32;
        }
        self.nodes.push(node);
    }

    pub fn hit_test(&self, p: Pos) -> Option<&Node> {
        self.topmost(p, |_| true)
    }

    pub fn hit_test_with_sense(&self, p: Pos, required: Sense) -> Option<&Node> {
        self.topmost(p, |n| n.sense.contains(required))
    }

    pub fn hit_test_with_sense_where<F>(
        &self,
        p: Pos,
        required: Sense,
        mut pred: F,
    ) -> Option<&Node>
    where
        F: FnMut(&Node) -> bool,
    {
        self.topmost(p, |n| n.sense.contains(required) && pred(n))
    }

    // Highest layer wins; within a layer, higher z wins.
    fn topmost<F>(&self, p: Pos, mut accept: F) -> Option<&Node>
    where
        F: FnMut(&Node) -> bool,
    {
        self.nodes
            .iter()
            .filter(|n| n.contains(p) && accept(n))
            .max_by(|a, b| (a.layer, a.z).cmp(&(b.layer, b.z)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/scene.rs"]
mod tests;
