//! 结构面板控制器。
//!
//! 把模型、模板、交互运行时和视图装配在一起：输入事件进来，
//! 结构事件和重绘请求出去。面板不直接碰终端，渲染统一走视图层。

use crate::app::dnd::{self, PanelDndRules};
use crate::app::theme::PanelTheme;
use crate::models::{
    OutlineRow, PageKey, QuestionKey, StructureError, SurveyStructure,
};
use crate::runtime::{EventBus, StructureEvent};
use crate::services::{
    Control, PanelConfig, PanelTemplate, ProviderError, SurveyProvider, TemplateError,
};
use crate::ui::{
    EventResult, InputEvent, KeyCode, KeyModifiers, MouseEventKind, NodeKind, UiEvent, UiRuntime,
    UiTree,
};
use crate::views::PanelView;
use ratatui::layout::Rect;
use ratatui::Frame;
use slotmap::KeyData;
use std::fmt;
use std::path::Path;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

const SELECT_PAGE_FIRST: &str = "Please select a page first";

#[derive(Debug)]
pub enum PanelError {
    Template(TemplateError),
    Provider(ProviderError),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Template(e) => write!(f, "panel template: {}", e),
            PanelError::Provider(e) => write!(f, "survey source: {}", e),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Template(e) => Some(e),
            PanelError::Provider(e) => Some(e),
        }
    }
}

impl From<TemplateError> for PanelError {
    fn from(e: TemplateError) -> Self {
        PanelError::Template(e)
    }
}

impl From<ProviderError> for PanelError {
    fn from(e: ProviderError) -> Self {
        PanelError::Provider(e)
    }
}

/// 待确认的删除目标。对话框打开期间其它输入被挡住。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Page(PageKey),
    Question(QuestionKey),
}

pub struct StructurePanel {
    model: SurveyStructure,
    template: PanelTemplate,
    config: PanelConfig,
    theme: PanelTheme,
    bus: EventBus,
    runtime: UiRuntime,
    tree: UiTree,
    view: PanelView,
    rows: Vec<OutlineRow>,
    panel_collapsed: bool,
    notice: Option<String>,
    pending_delete: Option<DeleteTarget>,
    scroll: usize,
}

impl StructurePanel {
    pub fn new(template: PanelTemplate, config: PanelConfig, model: SurveyStructure) -> Self {
        for control in [
            Control::PanelToggle,
            Control::AddPage,
            Control::AddQuestion,
            Control::PageCollapse,
            Control::Delete,
            Control::Duplicate,
        ] {
            if !template.has(control) {
                warn!(?control, "panel control absent from template, feature disabled");
            }
        }

        let rows = model.flatten_rows();
        Self {
            runtime: UiRuntime::with_threshold(config.drag_threshold),
            model,
            template,
            config,
            theme: PanelTheme::default(),
            bus: EventBus::new(),
            tree: UiTree::new(),
            view: PanelView::new(),
            rows,
            panel_collapsed: false,
            notice: None,
            pending_delete: None,
            scroll: 0,
        }
    }

    /// 从模板文件和问卷数据源装配面板。模板缺失是致命错误。
    pub fn load(
        template_path: Option<&Path>,
        provider: &dyn SurveyProvider,
        config: PanelConfig,
    ) -> Result<Self, PanelError> {
        let template = match template_path {
            Some(path) => PanelTemplate::load(path)?,
            None => PanelTemplate::full(),
        };
        let doc = provider.load()?;
        info!(
            pages = doc.pages.len(),
            title = %template.title,
            "structure panel loaded"
        );
        Ok(Self::new(template, config, SurveyStructure::from_doc(&doc)))
    }

    pub fn subscribe(&mut self) -> Receiver<StructureEvent> {
        self.bus.subscribe()
    }

    pub fn structure(&self) -> &SurveyStructure {
        &self.model
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub fn is_panel_collapsed(&self) -> bool {
        self.panel_collapsed
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// 重建场景树。渲染前以及（无头测试里）注入输入前都要先调用。
    pub fn layout(&mut self, frame_area: Rect) {
        self.clamp_scroll();
        self.view.layout(
            frame_area,
            &self.rows,
            &self.template,
            &self.config,
            self.scroll,
            self.panel_collapsed,
            self.pending_delete.is_some(),
            &mut self.tree,
        );
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.layout(frame.area());
        let dialog_message = self.dialog_message();
        self.view.render(
            frame,
            &self.rows,
            &self.template,
            &self.config,
            &self.theme,
            self.scroll,
            self.panel_collapsed,
            dialog_message.as_deref(),
            self.notice.as_deref(),
            &self.runtime,
            &self.tree,
        );
    }

    pub fn handle_input(&mut self, input: &InputEvent) -> EventResult {
        if let InputEvent::Key(key) = input {
            return self.handle_key(key);
        }

        if let InputEvent::Mouse(me) = input {
            match me.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll = self.scroll.saturating_sub(self.config.scroll_step());
                    return EventResult::Consumed;
                }
                MouseEventKind::ScrollDown => {
                    self.scroll += self.config.scroll_step();
                    self.clamp_scroll();
                    return EventResult::Consumed;
                }
                _ => {}
            }
        }

        let out = self.runtime.on_input(input, &self.tree, &PanelDndRules);
        let mut result = if out.needs_redraw {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        };
        for event in out.events {
            if self.apply_ui_event(event) {
                result = EventResult::Consumed;
            }
        }
        result
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> EventResult {
        if key.kind != crossterm::event::KeyEventKind::Press {
            return EventResult::Ignored;
        }

        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Esc => {
                    self.pending_delete = None;
                    return EventResult::Consumed;
                }
                KeyCode::Enter => {
                    self.confirm_delete();
                    return EventResult::Consumed;
                }
                _ => return EventResult::Consumed,
            }
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                EventResult::Quit
            }
            KeyCode::Esc => {
                self.model.clear_selection();
                self.refresh_rows();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn apply_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Click { id, .. } => {
                let Some(kind) = self.tree.node(id).map(|n| n.kind) else {
                    return false;
                };
                self.on_click(kind)
            }
            UiEvent::Drop { payload, target, pos } => {
                let Some(kind) = self.tree.node(target).map(|n| n.kind) else {
                    return false;
                };
                self.on_drop(payload, kind, pos.y)
            }
            UiEvent::DragStart { .. } | UiEvent::DragEnd { .. } => true,
            UiEvent::DragMove { .. } | UiEvent::HoverChanged { .. } => false,
        }
    }

    fn on_click(&mut self, kind: NodeKind) -> bool {
        self.notice = None;
        match kind {
            NodeKind::PanelToggle => {
                self.panel_collapsed = !self.panel_collapsed;
                debug!(collapsed = self.panel_collapsed, "panel toggled");
            }
            NodeKind::AddPageButton => {
                let key = self.model.add_page();
                let page_id = self.model.page_id(key).cloned().unwrap_or_default();
                info!(%page_id, "page added");
                self.bus.emit(StructureEvent::PageAdded {
                    page_id: page_id.clone(),
                });
                self.bus.emit(StructureEvent::PageSelected { page_id });
                self.refresh_rows();
            }
            NodeKind::AddQuestionButton => match self.model.add_question() {
                Ok(key) => {
                    let question_id = self.model.question_id(key).cloned().unwrap_or_default();
                    let page_id = self
                        .model
                        .page_of(key)
                        .and_then(|p| self.model.page_id(p).cloned())
                        .unwrap_or_default();
                    info!(%question_id, %page_id, "question added");
                    self.bus.emit(StructureEvent::QuestionAdded {
                        question_id: question_id.clone(),
                        page_id: page_id.clone(),
                    });
                    self.bus
                        .emit(StructureEvent::QuestionSelected { question_id, page_id });
                    self.refresh_rows();
                }
                Err(StructureError::NoActivePage) => {
                    self.notice = Some(SELECT_PAGE_FIRST.to_string());
                    warn!("add question without an active page");
                }
                Err(e) => warn!(error = %e, "add question failed"),
            },
            NodeKind::PageRow { page } => {
                let key = page_key(page);
                if self.model.select_page(key).is_ok() {
                    let page_id = self.model.page_id(key).cloned().unwrap_or_default();
                    self.bus.emit(StructureEvent::PageSelected { page_id });
                    self.refresh_rows();
                }
            }
            NodeKind::QuestionRow { question, .. } => {
                let key = question_key(question);
                if let Ok(owner) = self.model.select_question(key) {
                    let question_id = self.model.question_id(key).cloned().unwrap_or_default();
                    let page_id = self.model.page_id(owner).cloned().unwrap_or_default();
                    self.bus
                        .emit(StructureEvent::QuestionSelected { question_id, page_id });
                    self.refresh_rows();
                }
            }
            NodeKind::PageCollapseToggle { page } => {
                self.model.toggle_collapse(page_key(page));
                self.refresh_rows();
            }
            NodeKind::PageDeleteButton { page } => {
                self.pending_delete = Some(DeleteTarget::Page(page_key(page)));
            }
            NodeKind::QuestionDeleteButton { question } => {
                self.pending_delete = Some(DeleteTarget::Question(question_key(question)));
            }
            NodeKind::PageDuplicateButton { page } => {
                if let Ok(copy) = self.model.duplicate_page(page_key(page)) {
                    let page_id = self.model.page_id(copy).cloned().unwrap_or_default();
                    info!(%page_id, "page duplicated");
                    self.bus.emit(StructureEvent::PageAdded {
                        page_id: page_id.clone(),
                    });
                    self.bus.emit(StructureEvent::PageSelected { page_id });
                    self.refresh_rows();
                }
            }
            NodeKind::QuestionDuplicateButton { question } => {
                if let Ok(copy) = self.model.duplicate_question(question_key(question)) {
                    let question_id = self.model.question_id(copy).cloned().unwrap_or_default();
                    let page_id = self
                        .model
                        .page_of(copy)
                        .and_then(|p| self.model.page_id(p).cloned())
                        .unwrap_or_default();
                    info!(%question_id, "question duplicated");
                    self.bus.emit(StructureEvent::QuestionAdded {
                        question_id: question_id.clone(),
                        page_id: page_id.clone(),
                    });
                    self.bus
                        .emit(StructureEvent::QuestionSelected { question_id, page_id });
                    self.refresh_rows();
                }
            }
            NodeKind::DialogCancel => {
                self.pending_delete = None;
            }
            NodeKind::DialogConfirm => {
                self.confirm_delete();
            }
            // 对话框遮罩或无交互区域。
            _ => return false,
        }
        true
    }

    fn on_drop(&mut self, payload: crate::ui::DragPayload, kind: NodeKind, pointer_y: u16) -> bool {
        use crate::ui::DragPayload;
        match (payload, kind) {
            (DragPayload::Page { page }, NodeKind::PageList) => {
                let to = dnd::insert_index(self.view.page_slots(), page, pointer_y);
                if self.model.move_page(page_key(page), to).is_ok() {
                    debug!(to, "page moved");
                    self.emit_snapshot();
                    self.refresh_rows();
                    return true;
                }
            }
            (DragPayload::Question { question, from_page }, NodeKind::QuestionList { page }) => {
                let to = dnd::insert_index(self.view.question_slots(page), question, pointer_y);
                if self
                    .model
                    .move_question(question_key(question), page_key(page), to)
                    .is_ok()
                {
                    debug!(to, cross_page = from_page != page, "question moved");
                    self.emit_snapshot();
                    self.refresh_rows();
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    fn confirm_delete(&mut self) {
        let Some(target) = self.pending_delete.take() else {
            return;
        };
        match target {
            DeleteTarget::Page(key) => {
                if let Ok(page_id) = self.model.delete_page(key) {
                    info!(%page_id, "page deleted");
                    self.bus.emit(StructureEvent::PageDeleted { page_id });
                    self.refresh_rows();
                }
            }
            DeleteTarget::Question(key) => {
                if let Ok((question_id, owner)) = self.model.delete_question(key) {
                    let page_id = self.model.page_id(owner).cloned().unwrap_or_default();
                    info!(%question_id, "question deleted");
                    self.bus
                        .emit(StructureEvent::QuestionDeleted { question_id, page_id });
                    self.refresh_rows();
                }
            }
        }
    }

    fn dialog_message(&self) -> Option<String> {
        match self.pending_delete? {
            DeleteTarget::Page(key) => {
                let title = self.model.page_title(key)?;
                Some(format!("Delete page \"{}\" and its questions?", title))
            }
            DeleteTarget::Question(key) => {
                let title = self.model.question_title(key)?;
                Some(format!("Delete question \"{}\"?", title))
            }
        }
    }

    fn emit_snapshot(&mut self) {
        self.bus.emit(StructureEvent::StructureUpdated {
            survey: self.model.to_doc(),
        });
    }

    fn refresh_rows(&mut self) {
        self.rows = self.model.flatten_rows();
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let height = self.view.list_height();
        let max = self.rows.len().saturating_sub(height.max(1));
        if self.scroll > max {
            self.scroll = max;
        }
    }
}

fn page_key(bits: u64) -> PageKey {
    PageKey::from(KeyData::from_ffi(bits))
}

fn question_key(bits: u64) -> QuestionKey {
    QuestionKey::from(KeyData::from_ffi(bits))
}

#[cfg(test)]
#[path = "../../tests/unit/app/panel.rs"]
mod tests;
