//! 结构面板视图（布局 + 纯渲染）。
//!
//! `layout` 负责把扁平化的行列表翻译成命中测试场景树和插入槽位，
//! `render` 只做绘制。两者分离，便于在无终端环境下测试交互逻辑。

use crate::app::theme::PanelTheme;
use crate::models::{OutlineRow, QuestionKind};
use crate::services::{Control, PanelConfig, PanelTemplate};
use crate::ui::{DragPayload, Id, IdPath, Node, NodeKind, Sense, UiRuntime, UiTree};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rustc_hash::FxHashMap;
use slotmap::Key;
use unicode_width::UnicodeWidthChar;

/// 插入槽位：一行的中线（虚拟坐标，允许滚出屏幕）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSlot {
    pub key: u64,
    pub mid_y: i32,
}

const COLLAPSED_WIDTH: u16 = 3;
const DIALOG_WIDTH: u16 = 38;
const DIALOG_HEIGHT: u16 = 6;

pub struct PanelView {
    panel_area: Option<Rect>,
    list_area: Option<Rect>,
    page_slots: Vec<RowSlot>,
    question_slots: FxHashMap<u64, Vec<RowSlot>>,
    dialog_rect: Option<Rect>,
    dialog_cancel: Option<Rect>,
    dialog_confirm: Option<Rect>,
}

impl PanelView {
    pub fn new() -> Self {
        Self {
            panel_area: None,
            list_area: None,
            page_slots: Vec::new(),
            question_slots: FxHashMap::default(),
            dialog_rect: None,
            dialog_cancel: None,
            dialog_confirm: None,
        }
    }

    pub fn list_area(&self) -> Option<Rect> {
        self.list_area
    }

    /// 可见列表行数（滚动裁剪用）。
    pub fn list_height(&self) -> usize {
        self.list_area.map(|a| a.height as usize).unwrap_or(0)
    }

    pub fn page_slots(&self) -> &[RowSlot] {
        &self.page_slots
    }

    pub fn question_slots(&self, page: u64) -> &[RowSlot] {
        self.question_slots
            .get(&page)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 重建场景树和槽位表。每帧调用一次，布局变化即生效。
    #[allow(clippy::too_many_arguments)]
    pub fn layout(
        &mut self,
        frame_area: Rect,
        rows: &[OutlineRow],
        template: &PanelTemplate,
        config: &PanelConfig,
        scroll: usize,
        panel_collapsed: bool,
        dialog: bool,
        tree: &mut UiTree,
    ) {
        tree.clear();
        self.page_slots.clear();
        self.question_slots.clear();
        self.dialog_rect = None;
        self.dialog_cancel = None;
        self.dialog_confirm = None;

        let width = if panel_collapsed {
            COLLAPSED_WIDTH.min(frame_area.width)
        } else {
            config.panel_width.min(frame_area.width)
        };
        let panel = Rect::new(frame_area.x, frame_area.y, width, frame_area.height);
        self.panel_area = Some(panel);

        if template.has(Control::PanelToggle) && panel.width >= 3 && panel.height >= 1 {
            tree.push(Node {
                id: node_id("toggle", 0),
                rect: ui_rect(Rect::new(panel.x + panel.width - 3, panel.y, 3, 1)),
                layer: 0,
                z: 0,
                sense: Sense::CLICK | Sense::HOVER,
                kind: NodeKind::PanelToggle,
            });
        }

        if panel_collapsed || panel.width < 8 || panel.height < 4 {
            self.list_area = None;
            return;
        }

        // 边框内再留一行工具栏、一行提示。
        let inner = Rect::new(
            panel.x + 1,
            panel.y + 1,
            panel.width - 2,
            panel.height - 2,
        );
        let toolbar = Rect::new(inner.x, inner.y, inner.width, 1);
        let list = Rect::new(
            inner.x,
            inner.y + 1,
            inner.width,
            inner.height.saturating_sub(2),
        );
        self.list_area = Some(list);

        let mut tx = toolbar.x;
        if template.has(Control::AddPage) {
            let w = 8; // "+ Page"
            tree.push(Node {
                id: node_id("add-page", 0),
                rect: ui_rect(Rect::new(tx, toolbar.y, w, 1)),
                layer: 0,
                z: 0,
                sense: Sense::CLICK | Sense::HOVER,
                kind: NodeKind::AddPageButton,
            });
            tx += w + 1;
        }
        if template.has(Control::AddQuestion) {
            let w = 12; // "+ Question"
            tree.push(Node {
                id: node_id("add-question", 0),
                rect: ui_rect(Rect::new(tx, toolbar.y, w.min(toolbar.width), 1)),
                layer: 0,
                z: 0,
                sense: Sense::CLICK | Sense::HOVER,
                kind: NodeKind::AddQuestionButton,
            });
        }

        if list.height == 0 {
            return;
        }

        // 整个列表区域接收页面拖放；z 最低，问题列表压在上面。
        tree.push(Node {
            id: node_id("page-list", 0),
            rect: ui_rect(list),
            layer: 0,
            z: 0,
            sense: Sense::DROP_TARGET,
            kind: NodeKind::PageList,
        });

        let view_top = scroll as i32;
        let view_bot = scroll as i32 + list.height as i32;
        let screen_y = |vi: i32| -> Option<u16> {
            if vi >= view_top && vi < view_bot {
                Some(list.y + (vi - view_top) as u16)
            } else {
                None
            }
        };
        let virtual_mid = |vi: i32| -> i32 { list.y as i32 + vi - scroll as i32 };

        // 先扫一遍，给每个展开页面记下它的行区间（页头 + 问题行），
        // 作为问题拖放的容器。
        let mut vi: i32 = 0;
        let mut open_page: Option<(u64, i32, i32)> = None;
        let mut containers: Vec<(u64, i32, i32)> = Vec::new();
        for row in rows {
            match row {
                OutlineRow::Page { key, collapsed, .. } => {
                    if let Some(c) = open_page.take() {
                        containers.push(c);
                    }
                    let bits = key.data().as_ffi();
                    self.page_slots.push(RowSlot {
                        key: bits,
                        mid_y: virtual_mid(vi),
                    });
                    if !collapsed {
                        open_page = Some((bits, vi, vi + 1));
                    }
                }
                OutlineRow::Question { key, page, .. } => {
                    let bits = key.data().as_ffi();
                    let page_bits = page.data().as_ffi();
                    self.question_slots
                        .entry(page_bits)
                        .or_default()
                        .push(RowSlot {
                            key: bits,
                            mid_y: virtual_mid(vi),
                        });
                    if let Some((_, _, end)) = &mut open_page {
                        *end = vi + 1;
                    }
                }
            }
            vi += 1;
        }
        if let Some(c) = open_page.take() {
            containers.push(c);
        }
        for (page_bits, start, end) in containers {
            let top = start.max(view_top);
            let bot = end.min(view_bot);
            if top >= bot {
                continue;
            }
            tree.push(Node {
                id: node_id("qlist", page_bits),
                rect: ui_rect(Rect::new(
                    list.x,
                    list.y + (top - view_top) as u16,
                    list.width,
                    (bot - top) as u16,
                )),
                layer: 0,
                z: 0,
                sense: Sense::DROP_TARGET,
                kind: NodeKind::QuestionList { page: page_bits },
            });
        }

        // 再扫一遍生成可见行的交互节点。
        let right = list.x + list.width;
        let mut vi: i32 = 0;
        for row in rows {
            let Some(y) = screen_y(vi) else {
                vi += 1;
                continue;
            };
            match row {
                OutlineRow::Page { key, .. } => {
                    let bits = key.data().as_ffi();
                    tree.push(Node {
                        id: node_id("page", bits),
                        rect: ui_rect(Rect::new(list.x, y, list.width, 1)),
                        layer: 0,
                        z: 0,
                        sense: Sense::CLICK | Sense::HOVER,
                        kind: NodeKind::PageRow { page: bits },
                    });
                    if template.has(Control::PageCollapse) {
                        tree.push(Node {
                            id: node_id("collapse", bits),
                            rect: ui_rect(Rect::new(list.x, y, 2, 1)),
                            layer: 0,
                            z: 0,
                            sense: Sense::CLICK | Sense::HOVER,
                            kind: NodeKind::PageCollapseToggle { page: bits },
                        });
                    }
                    tree.push(Node {
                        id: node_id("page-handle", bits),
                        rect: ui_rect(Rect::new(list.x + 2, y, 1, 1)),
                        layer: 0,
                        z: 0,
                        sense: Sense::HOVER | Sense::DRAG_SOURCE,
                        kind: NodeKind::PageDragHandle { page: bits },
                    });
                    if template.has(Control::Delete) && list.width > 6 {
                        tree.push(Node {
                            id: node_id("page-del", bits),
                            rect: ui_rect(Rect::new(right - 2, y, 1, 1)),
                            layer: 0,
                            z: 0,
                            sense: Sense::CLICK | Sense::HOVER,
                            kind: NodeKind::PageDeleteButton { page: bits },
                        });
                    }
                    if template.has(Control::Duplicate) && list.width > 8 {
                        tree.push(Node {
                            id: node_id("page-dup", bits),
                            rect: ui_rect(Rect::new(right - 4, y, 1, 1)),
                            layer: 0,
                            z: 0,
                            sense: Sense::CLICK | Sense::HOVER,
                            kind: NodeKind::PageDuplicateButton { page: bits },
                        });
                    }
                }
                OutlineRow::Question { key, page, .. } => {
                    let bits = key.data().as_ffi();
                    let page_bits = page.data().as_ffi();
                    tree.push(Node {
                        id: node_id("q", bits),
                        rect: ui_rect(Rect::new(list.x, y, list.width, 1)),
                        layer: 0,
                        z: 0,
                        sense: Sense::CLICK | Sense::HOVER,
                        kind: NodeKind::QuestionRow {
                            question: bits,
                            page: page_bits,
                        },
                    });
                    tree.push(Node {
                        id: node_id("q-handle", bits),
                        rect: ui_rect(Rect::new(list.x + 2, y, 1, 1)),
                        layer: 0,
                        z: 0,
                        sense: Sense::HOVER | Sense::DRAG_SOURCE,
                        kind: NodeKind::QuestionDragHandle {
                            question: bits,
                            page: page_bits,
                        },
                    });
                    if template.has(Control::Delete) && list.width > 6 {
                        tree.push(Node {
                            id: node_id("q-del", bits),
                            rect: ui_rect(Rect::new(right - 2, y, 1, 1)),
                            layer: 0,
                            z: 0,
                            sense: Sense::CLICK | Sense::HOVER,
                            kind: NodeKind::QuestionDeleteButton { question: bits },
                        });
                    }
                    if template.has(Control::Duplicate) && list.width > 8 {
                        tree.push(Node {
                            id: node_id("q-dup", bits),
                            rect: ui_rect(Rect::new(right - 4, y, 1, 1)),
                            layer: 0,
                            z: 0,
                            sense: Sense::CLICK | Sense::HOVER,
                            kind: NodeKind::QuestionDuplicateButton { question: bits },
                        });
                    }
                }
            }
            vi += 1;
        }

        if dialog {
            // 对话框矩形按帧面积截断，渲染端只用这里算好的矩形，
            // 小终端下不会越界。
            let rect = centered_rect(frame_area, DIALOG_WIDTH, DIALOG_HEIGHT);
            self.dialog_rect = Some(rect);
            // 遮罩：对话框打开时吞掉下层的所有点击。
            tree.push(Node {
                id: node_id("dialog-backdrop", 0),
                rect: ui_rect(frame_area),
                layer: 1,
                z: 0,
                sense: Sense::CLICK,
                kind: NodeKind::Unknown,
            });
            let by = rect.y + rect.height.saturating_sub(2);
            let bw = 10.min(rect.width / 2);
            let bh = rect.height.min(1);
            let cancel = Rect::new(rect.x + 3.min(rect.width.saturating_sub(bw)), by, bw, bh);
            let confirm = Rect::new(rect.x + rect.width.saturating_sub(bw + 3), by, bw, bh);
            self.dialog_cancel = Some(cancel);
            self.dialog_confirm = Some(confirm);
            tree.push(Node {
                id: node_id("dialog-cancel", 0),
                rect: ui_rect(cancel),
                layer: 1,
                z: 0,
                sense: Sense::CLICK | Sense::HOVER,
                kind: NodeKind::DialogCancel,
            });
            tree.push(Node {
                id: node_id("dialog-confirm", 0),
                rect: ui_rect(confirm),
                layer: 1,
                z: 0,
                sense: Sense::CLICK | Sense::HOVER,
                kind: NodeKind::DialogConfirm,
            });
        }
    }

    fn render_row(
        &self,
        row: &OutlineRow,
        width: usize,
        config: &PanelConfig,
        template: &PanelTemplate,
        theme: &PanelTheme,
        hovered: bool,
        drag_source: bool,
    ) -> Line<'static> {
        let buttons = {
            let mut b = String::new();
            if template.has(Control::Duplicate) {
                b.push_str("⧉ ");
            }
            if template.has(Control::Delete) {
                b.push('✕');
            }
            b
        };
        let reserved = buttons.chars().count() + 1;

        let (text, style) = match row {
            OutlineRow::Page {
                title,
                collapsed,
                active,
                question_count,
                ..
            } => {
                let arrow = if *collapsed { "▸" } else { "▾" };
                let text = format!("{} ≡ {} ({})", arrow, title, question_count);
                let style = if *active {
                    Style::default()
                        .bg(theme.selected_bg)
                        .fg(theme.selected_fg)
                } else {
                    Style::default().fg(theme.page_fg)
                };
                (text, style)
            }
            OutlineRow::Question {
                title,
                kind,
                active,
                ..
            } => {
                let icon = if config.show_type_icons {
                    kind_icon(*kind)
                } else {
                    ""
                };
                let text = format!("  ≡ {}{}", icon, title);
                let style = if *active {
                    Style::default()
                        .bg(theme.selected_bg)
                        .fg(theme.selected_fg)
                } else {
                    Style::default().fg(theme.question_fg)
                };
                (text, style)
            }
        };

        let style = if drag_source {
            style.add_modifier(Modifier::DIM)
        } else if hovered {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        };

        let body = truncate_to_width(&text, width.saturating_sub(reserved));
        let pad = width
            .saturating_sub(reserved)
            .saturating_sub(display_width(&body));
        let mut spans = vec![Span::styled(body, style)];
        spans.push(Span::styled(" ".repeat(pad + 1), style));
        if !buttons.is_empty() {
            spans.push(Span::styled(buttons, Style::default().fg(theme.muted_fg)));
        }
        Line::from(spans)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        frame: &mut Frame,
        rows: &[OutlineRow],
        template: &PanelTemplate,
        config: &PanelConfig,
        theme: &PanelTheme,
        scroll: usize,
        panel_collapsed: bool,
        dialog_message: Option<&str>,
        notice: Option<&str>,
        runtime: &UiRuntime,
        tree: &UiTree,
    ) {
        let Some(panel) = self.panel_area else {
            return;
        };

        if panel_collapsed {
            let strip = Paragraph::new("»").style(Style::default().fg(theme.accent_fg));
            frame.render_widget(strip, Rect::new(panel.x, panel.y, panel.width.min(1), 1));
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_fg))
            .title(format!(" {} ", template.title));
        frame.render_widget(block, panel);

        if panel.width < 8 || panel.height < 4 {
            return;
        }

        let inner = Rect::new(panel.x + 1, panel.y + 1, panel.width - 2, panel.height - 2);

        let mut toolbar = vec![];
        if template.has(Control::AddPage) {
            toolbar.push(Span::styled(
                "[+ Page]",
                Style::default().fg(theme.accent_fg),
            ));
            toolbar.push(Span::raw(" "));
        }
        if template.has(Control::AddQuestion) {
            toolbar.push(Span::styled(
                "[+ Question]",
                Style::default().fg(theme.accent_fg),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(toolbar)),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );
        if template.has(Control::PanelToggle) {
            frame.render_widget(
                Paragraph::new("«").style(Style::default().fg(theme.muted_fg)),
                Rect::new(panel.x + panel.width - 3, panel.y, 1, 1),
            );
        }

        let Some(list) = self.list_area else {
            return;
        };

        let hovered_row = runtime.hovered().and_then(|id| tree.node(id)).map(|n| n.kind);
        let drag_source = runtime.drag_payload().copied();

        let visible_end = (scroll + list.height as usize).min(rows.len());
        let lines: Vec<Line> = rows[scroll..visible_end]
            .iter()
            .map(|row| {
                let hovered = row_matches_kind(row, hovered_row);
                let dragging = drag_source.is_some_and(|p| row_is_drag_source(row, &p));
                self.render_row(
                    row,
                    list.width as usize,
                    config,
                    template,
                    theme,
                    hovered,
                    dragging,
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), list);

        // 拖动中：把指针所在目标行涂上强调色。
        if runtime.is_dragging() {
            if let Some(over) = runtime.drag_over().and_then(|id| tree.node(id)) {
                if let Some(pos) = runtime.last_pos() {
                    let r = over.rect;
                    if pos.y >= r.y && pos.y < r.bottom() {
                        frame.render_widget(
                            Paragraph::new("▸").style(Style::default().fg(theme.accent_fg)),
                            Rect::new(list.x, pos.y, 1, 1),
                        );
                    }
                }
            }
        }

        if let Some(notice) = notice {
            let y = inner.y + inner.height - 1;
            frame.render_widget(
                Paragraph::new(truncate_to_width(notice, inner.width as usize))
                    .style(Style::default().fg(theme.notice_fg)),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }

        if let Some(message) = dialog_message {
            self.render_dialog(frame, message, theme);
        }
    }

    fn render_dialog(&self, frame: &mut Frame, message: &str, theme: &PanelTheme) {
        let (Some(rect), Some(cancel), Some(confirm)) =
            (self.dialog_rect, self.dialog_cancel, self.dialog_confirm)
        else {
            return;
        };
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dialog_border_fg))
            .title(" Confirm delete ");
        frame.render_widget(block, rect);

        let body = Rect::new(
            rect.x + 2.min(rect.width),
            rect.y + 1.min(rect.height),
            rect.width.saturating_sub(4),
            rect.height.saturating_sub(4),
        );
        frame.render_widget(
            Paragraph::new(truncate_to_width(message, body.width as usize * 2))
                .style(Style::default().fg(theme.dialog_fg))
                .wrap(Wrap { trim: true }),
            body,
        );
        frame.render_widget(
            Paragraph::new("[ Cancel ]").style(Style::default().fg(theme.dialog_fg)),
            cancel,
        );
        frame.render_widget(
            Paragraph::new("[ Delete ]").style(
                Style::default()
                    .fg(theme.danger_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            confirm,
        );
    }
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}

fn node_id(ns: &'static str, bits: u64) -> Id {
    IdPath::root("panel").push_str(ns).push_u64(bits).finish()
}

fn ui_rect(r: Rect) -> crate::ui::Rect {
    crate::ui::Rect::new(r.x, r.y, r.width, r.height)
}

fn centered_rect(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn kind_icon(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Text => "¶ ",
        QuestionKind::Choice => "◉ ",
        QuestionKind::Number => "# ",
        QuestionKind::Matrix => "▤ ",
    }
}

fn row_matches_kind(row: &OutlineRow, kind: Option<NodeKind>) -> bool {
    let Some(kind) = kind else {
        return false;
    };
    match (row, kind) {
        (OutlineRow::Page { key, .. }, NodeKind::PageRow { page })
        | (OutlineRow::Page { key, .. }, NodeKind::PageDragHandle { page }) => {
            key.data().as_ffi() == page
        }
        (OutlineRow::Question { key, .. }, NodeKind::QuestionRow { question, .. })
        | (OutlineRow::Question { key, .. }, NodeKind::QuestionDragHandle { question, .. }) => {
            key.data().as_ffi() == question
        }
        _ => false,
    }
}

fn row_is_drag_source(row: &OutlineRow, payload: &DragPayload) -> bool {
    match (row, payload) {
        (OutlineRow::Page { key, .. }, DragPayload::Page { page }) => {
            key.data().as_ffi() == *page
        }
        (OutlineRow::Question { key, .. }, DragPayload::Question { question, .. }) => {
            key.data().as_ffi() == *question
        }
        _ => false,
    }
}

fn display_width(s: &str) -> usize {
    s.chars().filter_map(UnicodeWidthChar::width).sum()
}

fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    // 截断时留出一格给省略号。
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max > 0 {
        out.push('…');
    }
    out
}
