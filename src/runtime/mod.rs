//! 消息运行时模块

mod message;

pub use message::{EventBus, StructureEvent};
