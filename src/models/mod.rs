//! 数据模型层

pub mod structure;

pub use structure::{
    OutlineRow, PageDoc, PageKey, QuestionDoc, QuestionKey, QuestionKind, StructureError,
    SurveyDoc, SurveyStructure,
};
