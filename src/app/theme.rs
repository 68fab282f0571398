//! 面板主题：把可配置的颜色集中管理，避免散落在渲染代码里。

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct PanelTheme {
    pub border_fg: Color,
    pub accent_fg: Color,
    pub page_fg: Color,
    pub question_fg: Color,
    pub muted_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub notice_fg: Color,
    pub dialog_border_fg: Color,
    pub dialog_fg: Color,
    pub danger_fg: Color,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            border_fg: Color::Indexed(8),        // DarkGray
            accent_fg: Color::Indexed(6),        // Cyan
            page_fg: Color::Indexed(3),          // Yellow
            question_fg: Color::Indexed(15),     // White
            muted_fg: Color::Indexed(8),         // DarkGray
            selected_bg: Color::Indexed(8),      // DarkGray
            selected_fg: Color::Indexed(15),     // White
            notice_fg: Color::Indexed(3),        // Yellow
            dialog_border_fg: Color::Indexed(6), // Cyan
            dialog_fg: Color::Indexed(15),       // White
            danger_fg: Color::Indexed(1),        // Red
        }
    }
}
