//! 应用装配层：面板控制器、拖放策略和主题。

pub mod dnd;
pub mod panel;
pub mod theme;

pub use panel::{DeleteTarget, PanelError, StructurePanel};
pub use theme::PanelTheme;
