//! 服务层模块
//!
//! - PanelConfig: 面板运行时配置
//! - PanelTemplate: 面板控件模板（初始化时加载）
//! - SurveyProvider: 初始问卷数据来源

pub mod config;
pub mod provider;
pub mod template;

pub use config::PanelConfig;
pub use provider::{JsonFileProvider, ProviderError, SampleProvider, SurveyProvider};
pub use template::{Control, PanelTemplate, TemplateError};
