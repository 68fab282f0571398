//! 问卷数据提供方
//!
//! 面板初始化时从提供方取得初始结构。内置一份示例问卷作为外部数据源
//! 的替身，另有从 JSON 文件读取的实现。

use crate::models::{PageDoc, QuestionDoc, QuestionKind, SurveyDoc};
use std::fmt;
use std::io;
use std::path::PathBuf;

pub trait SurveyProvider {
    fn load(&self) -> Result<SurveyDoc, ProviderError>;
}

#[derive(Debug)]
pub enum ProviderError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Io(e) => write!(f, "failed to read survey data: {e}"),
            ProviderError::Parse(e) => write!(f, "failed to parse survey data: {e}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Io(e) => Some(e),
            ProviderError::Parse(e) => Some(e),
        }
    }
}

/// 内置示例问卷。
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleProvider;

impl SurveyProvider for SampleProvider {
    fn load(&self) -> Result<SurveyDoc, ProviderError> {
        Ok(SurveyDoc {
            pages: vec![
                PageDoc {
                    id: "page1".into(),
                    title: "Page 1".into(),
                    questions: vec![
                        QuestionDoc {
                            id: "q1".into(),
                            title: "What is your age?".into(),
                            kind: QuestionKind::Number,
                        },
                        QuestionDoc {
                            id: "q2".into(),
                            title: "Select your gender".into(),
                            kind: QuestionKind::Choice,
                        },
                    ],
                },
                PageDoc {
                    id: "page2".into(),
                    title: "Page 2".into(),
                    questions: vec![QuestionDoc {
                        id: "q3".into(),
                        title: "Describe your experience".into(),
                        kind: QuestionKind::Text,
                    }],
                },
            ],
        })
    }
}

/// 从 JSON 文件读取问卷文档。
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SurveyProvider for JsonFileProvider {
    fn load(&self) -> Result<SurveyDoc, ProviderError> {
        let text = std::fs::read_to_string(&self.path).map_err(ProviderError::Io)?;
        serde_json::from_str(&text).map_err(ProviderError::Parse)
    }
}
