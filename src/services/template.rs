//! 面板模板
//!
//! 原型在初始化时拉取一段 HTML 片段来决定面板挂载哪些控件；这里对应为
//! 一份 JSON 模板文档。模板缺少某个控件时该功能静默降级为不可用（初始
//! 化时打 warn 日志），模板本身读取/解析失败则是致命的初始化错误。

use compact_str::CompactString;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    PanelToggle,
    AddPage,
    AddQuestion,
    PageCollapse,
    Delete,
    Duplicate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PanelTemplate {
    #[serde(default = "default_title")]
    pub title: CompactString,
    #[serde(default)]
    pub controls: Vec<Control>,
}

fn default_title() -> CompactString {
    "Survey structure".into()
}

impl PanelTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(TemplateError::Io)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(text).map_err(TemplateError::Parse)
    }

    /// 模板挂载了该控件吗？缺失即该功能不可用。
    pub fn has(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }

    /// 全量控件模板（测试与内置示例用）。
    pub fn full() -> Self {
        Self {
            title: default_title(),
            controls: vec![
                Control::PanelToggle,
                Control::AddPage,
                Control::AddQuestion,
                Control::PageCollapse,
                Control::Delete,
                Control::Duplicate,
            ],
        }
    }
}

#[derive(Debug)]
pub enum TemplateError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io(e) => write!(f, "failed to read panel template: {e}"),
            TemplateError::Parse(e) => write!(f, "failed to parse panel template: {e}"),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Io(e) => Some(e),
            TemplateError::Parse(e) => Some(e),
        }
    }
}
