//! 视图层：只负责布局和绘制，不直接改模型。

pub mod panel_view;

pub use panel_view::{PanelView, RowSlot};
