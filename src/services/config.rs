//! 配置服务：结构面板的运行时可调参数

#[derive(Clone, Debug)]
pub struct PanelConfig {
    /// 拖拽判定阈值（格），低于阈值的位移视为点击抖动
    pub drag_threshold: u16,
    /// 每次滚轮滚动的行数
    pub scroll_lines: usize,
    pub panel_width: u16,
    pub show_type_icons: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 2,
            scroll_lines: 1,
            panel_width: 34,
            show_type_icons: true,
        }
    }
}

impl PanelConfig {
    pub fn scroll_step(&self) -> usize {
        self.scroll_lines.max(1)
    }
}
