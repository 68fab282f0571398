//! 问卷结构数据模型
//!
//! 页面（Page）→ 问题（Question）的有序树。页面顺序与每页内的问题顺序
//! 即展示顺序；所有结构编辑（增、删、复制、拖拽移动）都是对这些有序
//! 列表的显式操作，视图只是模型的投影。

use compact_str::{format_compact, CompactString, ToCompactString};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

new_key_type! {
    pub struct PageKey;
    pub struct QuestionKey;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Text,
    Choice,
    Number,
    Matrix,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StructureError {
    UnknownPage,
    UnknownQuestion,
    /// add_question 需要先选中一个页面
    NoActivePage,
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnknownPage => write!(f, "unknown page"),
            StructureError::UnknownQuestion => write!(f, "unknown question"),
            StructureError::NoActivePage => write!(f, "no page is selected"),
        }
    }
}

impl std::error::Error for StructureError {}

/// 问卷文档：模型与外部世界（数据提供方、事件订阅方）交换的序列化形式。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyDoc {
    pub pages: Vec<PageDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDoc {
    pub id: CompactString,
    pub title: CompactString,
    #[serde(default)]
    pub questions: Vec<QuestionDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDoc {
    pub id: CompactString,
    pub title: CompactString,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone)]
struct PageNode {
    id: CompactString,
    title: CompactString,
    questions: Vec<QuestionKey>,
}

#[derive(Debug, Clone)]
struct QuestionNode {
    id: CompactString,
    title: CompactString,
    kind: QuestionKind,
    page: PageKey,
}

/// 结构面板的一行（视图投影）。
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineRow {
    Page {
        key: PageKey,
        id: CompactString,
        title: CompactString,
        collapsed: bool,
        active: bool,
        question_count: usize,
    },
    Question {
        key: QuestionKey,
        page: PageKey,
        id: CompactString,
        title: CompactString,
        kind: QuestionKind,
        active: bool,
    },
}

pub struct SurveyStructure {
    pages: SlotMap<PageKey, PageNode>,
    questions: SlotMap<QuestionKey, QuestionNode>,
    order: Vec<PageKey>,
    page_ids: FxHashMap<CompactString, PageKey>,
    question_ids: FxHashMap<CompactString, QuestionKey>,
    active_page: Option<PageKey>,
    active_question: Option<QuestionKey>,
    collapsed: FxHashSet<PageKey>,
}

impl SurveyStructure {
    pub fn new() -> Self {
        Self {
            pages: SlotMap::with_key(),
            questions: SlotMap::with_key(),
            order: Vec::new(),
            page_ids: FxHashMap::default(),
            question_ids: FxHashMap::default(),
            active_page: None,
            active_question: None,
            collapsed: FxHashSet::default(),
        }
    }

    pub fn from_doc(doc: &SurveyDoc) -> Self {
        let mut structure = Self::new();
        for page_doc in &doc.pages {
            let page = structure.insert_page(page_doc.id.clone(), page_doc.title.clone());
            for q in &page_doc.questions {
                structure.insert_question(page, q.id.clone(), q.title.clone(), q.kind);
            }
        }
        structure
    }

    pub fn to_doc(&self) -> SurveyDoc {
        let pages = self
            .order
            .iter()
            .filter_map(|&key| self.pages.get(key))
            .map(|page| PageDoc {
                id: page.id.clone(),
                title: page.title.clone(),
                questions: page
                    .questions
                    .iter()
                    .filter_map(|&qk| self.questions.get(qk))
                    .map(|q| QuestionDoc {
                        id: q.id.clone(),
                        title: q.title.clone(),
                        kind: q.kind,
                    })
                    .collect(),
            })
            .collect();
        SurveyDoc { pages }
    }

    // ---- 查询 ----

    pub fn page_order(&self) -> &[PageKey] {
        &self.order
    }

    pub fn page_count(&self) -> usize {
        self.order.len()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn page_id(&self, key: PageKey) -> Option<&CompactString> {
        self.pages.get(key).map(|p| &p.id)
    }

    pub fn page_title(&self, key: PageKey) -> Option<&CompactString> {
        self.pages.get(key).map(|p| &p.title)
    }

    pub fn questions_of(&self, key: PageKey) -> Option<&[QuestionKey]> {
        self.pages.get(key).map(|p| p.questions.as_slice())
    }

    pub fn question_id(&self, key: QuestionKey) -> Option<&CompactString> {
        self.questions.get(key).map(|q| &q.id)
    }

    pub fn question_title(&self, key: QuestionKey) -> Option<&CompactString> {
        self.questions.get(key).map(|q| &q.title)
    }

    pub fn question_kind(&self, key: QuestionKey) -> Option<QuestionKind> {
        self.questions.get(key).map(|q| q.kind)
    }

    pub fn page_of(&self, key: QuestionKey) -> Option<PageKey> {
        self.questions.get(key).map(|q| q.page)
    }

    pub fn find_page(&self, id: &str) -> Option<PageKey> {
        self.page_ids.get(id).copied()
    }

    pub fn find_question(&self, id: &str) -> Option<QuestionKey> {
        self.question_ids.get(id).copied()
    }

    // ---- 选中状态 ----

    pub fn active_page(&self) -> Option<PageKey> {
        self.active_page
    }

    pub fn active_question(&self) -> Option<QuestionKey> {
        self.active_question
    }

    /// 选中页面；任何已选中的问题被取消。
    pub fn select_page(&mut self, key: PageKey) -> Result<(), StructureError> {
        if !self.pages.contains_key(key) {
            return Err(StructureError::UnknownPage);
        }
        self.active_page = Some(key);
        self.active_question = None;
        Ok(())
    }

    /// 选中问题；所属页面同时成为活动页面。
    pub fn select_question(&mut self, key: QuestionKey) -> Result<PageKey, StructureError> {
        let page = self
            .questions
            .get(key)
            .map(|q| q.page)
            .ok_or(StructureError::UnknownQuestion)?;
        self.active_question = Some(key);
        self.active_page = Some(page);
        Ok(page)
    }

    pub fn clear_selection(&mut self) {
        self.active_page = None;
        self.active_question = None;
    }

    // ---- 折叠状态（仅视图状态，不影响结构） ----

    pub fn is_collapsed(&self, key: PageKey) -> bool {
        self.collapsed.contains(&key)
    }

    pub fn toggle_collapse(&mut self, key: PageKey) {
        if !self.pages.contains_key(key) {
            return;
        }
        if !self.collapsed.remove(&key) {
            self.collapsed.insert(key);
        }
    }

    // ---- 结构编辑 ----

    /// 在结构末尾追加新页面并选中它。
    pub fn add_page(&mut self) -> PageKey {
        let n = self.order.len() + 1;
        let id = self.unique_page_id(&format_compact!("page{n}"));
        let title = format_compact!("Page {n}");
        let key = self.insert_page(id, title);
        self.active_page = Some(key);
        self.active_question = None;
        key
    }

    /// 在当前活动页面末尾追加新问题（默认 text 类型）并选中它。
    pub fn add_question(&mut self) -> Result<QuestionKey, StructureError> {
        let page = self.active_page.ok_or(StructureError::NoActivePage)?;
        let n = self
            .pages
            .get(page)
            .ok_or(StructureError::UnknownPage)?
            .questions
            .len()
            + 1;
        let id = self.unique_question_id(&format_compact!("q{}_{}", n, timestamp_suffix()));
        let key = self.insert_question(page, id, "New Question".into(), QuestionKind::Text);
        self.active_question = Some(key);
        self.active_page = Some(page);
        Ok(key)
    }

    /// 深复制页面（含全部问题），插入到原页面之后并选中副本。
    pub fn duplicate_page(&mut self, key: PageKey) -> Result<PageKey, StructureError> {
        let source = self.pages.get(key).ok_or(StructureError::UnknownPage)?;
        let index = self
            .order
            .iter()
            .position(|&k| k == key)
            .ok_or(StructureError::UnknownPage)?;

        let ts = timestamp_suffix();
        let copy_id = self.unique_page_id(&format_compact!("page{}_{ts}", self.order.len() + 1));
        let copy_title = format_compact!("{} (Copy)", source.title);
        let source_questions: Vec<QuestionKey> = source.questions.clone();

        let copy = self.pages.insert(PageNode {
            id: copy_id.clone(),
            title: copy_title,
            questions: Vec::new(),
        });
        self.page_ids.insert(copy_id, copy);
        self.order.insert(index + 1, copy);

        for qk in source_questions {
            let Some(q) = self.questions.get(qk) else {
                continue;
            };
            let id = self.unique_question_id(&format_compact!("{}_copy_{ts}", q.id));
            let (title, kind) = (q.title.clone(), q.kind);
            self.insert_question(copy, id, title, kind);
        }

        self.active_page = Some(copy);
        self.active_question = None;
        Ok(copy)
    }

    /// 复制问题，插入到原问题之后并选中副本。
    pub fn duplicate_question(&mut self, key: QuestionKey) -> Result<QuestionKey, StructureError> {
        let source = self
            .questions
            .get(key)
            .ok_or(StructureError::UnknownQuestion)?;
        let page = source.page;
        let id = self.unique_question_id(&format_compact!(
            "{}_copy_{}",
            source.id,
            timestamp_suffix()
        ));
        let title = format_compact!("{} (Copy)", source.title);
        let kind = source.kind;

        let copy = self.questions.insert(QuestionNode {
            id: id.clone(),
            title,
            kind,
            page,
        });
        self.question_ids.insert(id, copy);

        let list = &mut self
            .pages
            .get_mut(page)
            .ok_or(StructureError::UnknownPage)?
            .questions;
        let index = list.iter().position(|&k| k == key).unwrap_or(list.len());
        list.insert((index + 1).min(list.len()), copy);

        self.active_question = Some(copy);
        self.active_page = Some(page);
        Ok(copy)
    }

    /// 删除页面及其全部问题。返回被删页面的 id。
    pub fn delete_page(&mut self, key: PageKey) -> Result<CompactString, StructureError> {
        let page = self.pages.remove(key).ok_or(StructureError::UnknownPage)?;
        self.order.retain(|&k| k != key);
        self.page_ids.remove(&page.id);
        self.collapsed.remove(&key);

        for qk in page.questions {
            if let Some(q) = self.questions.remove(qk) {
                self.question_ids.remove(&q.id);
            }
            if self.active_question == Some(qk) {
                self.active_question = None;
            }
        }

        if self.active_page == Some(key) {
            self.active_page = None;
            self.active_question = None;
        }
        Ok(page.id)
    }

    /// 删除问题。返回 (问题 id, 所属页面)。
    pub fn delete_question(
        &mut self,
        key: QuestionKey,
    ) -> Result<(CompactString, PageKey), StructureError> {
        let q = self
            .questions
            .remove(key)
            .ok_or(StructureError::UnknownQuestion)?;
        self.question_ids.remove(&q.id);
        if let Some(page) = self.pages.get_mut(q.page) {
            page.questions.retain(|&k| k != key);
        }
        if self.active_question == Some(key) {
            self.active_question = None;
        }
        Ok((q.id, q.page))
    }

    /// 把页面移动到页面列表中的指定位置。
    ///
    /// `to_index` 按移除被拖页面之后的列表计数（插入到该下标之前）。
    pub fn move_page(&mut self, key: PageKey, to_index: usize) -> Result<(), StructureError> {
        let from = self
            .order
            .iter()
            .position(|&k| k == key)
            .ok_or(StructureError::UnknownPage)?;
        self.order.remove(from);
        let to = to_index.min(self.order.len());
        self.order.insert(to, key);
        Ok(())
    }

    /// 把问题移动到目标页面的指定位置；跨页移动时所有权一并转移。
    pub fn move_question(
        &mut self,
        key: QuestionKey,
        to_page: PageKey,
        to_index: usize,
    ) -> Result<(), StructureError> {
        if !self.pages.contains_key(to_page) {
            return Err(StructureError::UnknownPage);
        }
        let from_page = self
            .questions
            .get(key)
            .map(|q| q.page)
            .ok_or(StructureError::UnknownQuestion)?;

        if let Some(page) = self.pages.get_mut(from_page) {
            page.questions.retain(|&k| k != key);
        }

        let list = &mut self
            .pages
            .get_mut(to_page)
            .ok_or(StructureError::UnknownPage)?
            .questions;
        let to = to_index.min(list.len());
        list.insert(to, key);

        if let Some(q) = self.questions.get_mut(key) {
            q.page = to_page;
        }
        Ok(())
    }

    pub fn set_page_title(
        &mut self,
        key: PageKey,
        title: CompactString,
    ) -> Result<(), StructureError> {
        let page = self.pages.get_mut(key).ok_or(StructureError::UnknownPage)?;
        page.title = title;
        Ok(())
    }

    // ---- 视图投影 ----

    pub fn flatten_rows(&self) -> Vec<OutlineRow> {
        let mut rows = Vec::new();
        for &page_key in &self.order {
            let Some(page) = self.pages.get(page_key) else {
                continue;
            };
            let collapsed = self.collapsed.contains(&page_key);
            rows.push(OutlineRow::Page {
                key: page_key,
                id: page.id.clone(),
                title: page.title.clone(),
                collapsed,
                active: self.active_page == Some(page_key),
                question_count: page.questions.len(),
            });
            if collapsed {
                continue;
            }
            for &qk in &page.questions {
                let Some(q) = self.questions.get(qk) else {
                    continue;
                };
                rows.push(OutlineRow::Question {
                    key: qk,
                    page: page_key,
                    id: q.id.clone(),
                    title: q.title.clone(),
                    kind: q.kind,
                    active: self.active_question == Some(qk),
                });
            }
        }
        rows
    }

    // ---- 内部 ----

    fn insert_page(&mut self, id: CompactString, title: CompactString) -> PageKey {
        let id = self.unique_page_id(&id);
        let key = self.pages.insert(PageNode {
            id: id.clone(),
            title,
            questions: Vec::new(),
        });
        self.page_ids.insert(id, key);
        self.order.push(key);
        key
    }

    fn insert_question(
        &mut self,
        page: PageKey,
        id: CompactString,
        title: CompactString,
        kind: QuestionKind,
    ) -> QuestionKey {
        let id = self.unique_question_id(&id);
        let key = self.questions.insert(QuestionNode {
            id: id.clone(),
            title,
            kind,
            page,
        });
        self.question_ids.insert(id, key);
        if let Some(node) = self.pages.get_mut(page) {
            node.questions.push(key);
        }
        key
    }

    fn unique_page_id(&self, candidate: &str) -> CompactString {
        if !self.page_ids.contains_key(candidate) {
            return candidate.to_compact_string();
        }
        let mut bump = timestamp_suffix();
        loop {
            let id = format_compact!("{candidate}_{bump}");
            if !self.page_ids.contains_key(&id) {
                return id;
            }
            bump += 1;
        }
    }

    fn unique_question_id(&self, candidate: &str) -> CompactString {
        if !self.question_ids.contains_key(candidate) {
            return candidate.to_compact_string();
        }
        let mut bump = timestamp_suffix();
        loop {
            let id = format_compact!("{candidate}_{bump}");
            if !self.question_ids.contains_key(&id) {
                return id;
            }
            bump += 1;
        }
    }
}

impl Default for SurveyStructure {
    fn default() -> Self {
        Self::new()
    }
}

/// 毫秒时间戳的后四位，作为 id 后缀来源。
fn timestamp_suffix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
        % 10000
}
