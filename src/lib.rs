//! qpanel - 问卷结构面板库
//!
//! 模块结构：
//! - models: 数据模型（SurveyStructure, SurveyDoc）
//! - runtime: 事件总线（EventBus, StructureEvent）
//! - services: 服务层（PanelConfig, PanelTemplate, SurveyProvider）
//! - ui: 交互层（UiTree, UiRuntime, 命中测试）
//! - views: 视图层（PanelView）
//! - app: 应用层（StructurePanel）

pub mod models;
pub mod runtime;
pub mod services;

#[cfg(feature = "tui")]
pub mod app;
#[cfg(feature = "tui")]
pub mod logging;
#[cfg(feature = "tui")]
pub mod ui;
#[cfg(feature = "tui")]
pub mod views;
