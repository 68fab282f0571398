//! Cell-grid geometry used by the hit-test tree.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned cell rectangle. `right`/`bottom` are exclusive bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(&self, p: Pos) -> bool {
        !self.is_empty()
            && (self.x..self.right()).contains(&p.x)
            && (self.y..self.bottom()).contains(&p.y)
    }

    /// Vertical midpoint row, used by the drop-position heuristic.
    pub fn mid_y(&self) -> u16 {
        self.y.saturating_add(self.h / 2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/geom.rs"]
mod tests;
