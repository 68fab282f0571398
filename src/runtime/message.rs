//! 结构变更通知
//!
//! 面板对外的消息通道：画布、持久化层等协作方通过订阅获得结构事件，
//! 取代原型里挂在全局 document 上的自定义事件。

use crate::models::SurveyDoc;
use compact_str::CompactString;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum StructureEvent {
    PageSelected {
        page_id: CompactString,
    },
    QuestionSelected {
        question_id: CompactString,
        page_id: CompactString,
    },
    PageAdded {
        page_id: CompactString,
    },
    QuestionAdded {
        question_id: CompactString,
        page_id: CompactString,
    },
    PageDeleted {
        page_id: CompactString,
    },
    QuestionDeleted {
        question_id: CompactString,
        page_id: CompactString,
    },
    /// 每次拖拽落位成功后携带完整结构快照。
    StructureUpdated {
        survey: SurveyDoc,
    },
}

/// 面板实例私有的事件总线。
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<StructureEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<StructureEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// 广播给所有存活的订阅方；断开的订阅方被移除。
    pub fn emit(&mut self, event: StructureEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
