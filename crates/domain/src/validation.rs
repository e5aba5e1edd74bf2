//! ペイロードのフィールド単位検証
//!
//! 作成と全体更新で同じ規則を使う。失敗したフィールドはすべて、
//! title → description → priority → dueDate の順に報告する。

use crate::todo::{parse_due_date, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub const TITLE_MESSAGE: &str = "Title is required and must be between 1 and 100 characters";
pub const DESCRIPTION_MESSAGE: &str = "Description cannot exceed 500 characters";
pub const PRIORITY_MESSAGE: &str = "Priority must be low, medium, or high";
pub const DUE_DATE_MESSAGE: &str = "Due date must be a valid date";

/// 1 フィールド分の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    /// 検証対象の値（title と description はトリム後）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl FieldError {
    pub fn field(path: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: "field".to_string(),
            value: None,
            msg: msg.into(),
            path: path.to_string(),
            location: "body".to_string(),
        }
    }

    /// JSON として解釈できないボディ全体に対するエラー
    pub fn body(msg: impl Into<String>) -> Self {
        Self {
            kind: "body".to_string(),
            value: None,
            msg: msg.into(),
            path: "body".to_string(),
            location: "body".to_string(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

/// 順序付きの検証エラー集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("validation failed for: {}", self.paths().join(", "))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// 失敗したフィールドのパス（報告順）
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

/// 作成・更新で共通のフィールドを検証した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckedFields {
    pub title: String,
    /// トリム後の説明。指定がなければ `None`
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

pub(crate) fn check_fields(
    title: &str,
    description: Option<&str>,
    priority: Option<&str>,
    due_date: Option<&str>,
) -> Result<CheckedFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = title.trim();
    let title_len = title.chars().count();
    if title_len == 0 || title_len > TITLE_MAX_CHARS {
        errors.push(FieldError::field("title", TITLE_MESSAGE).with_value(title));
    }

    let description = description.map(str::trim);
    if let Some(d) = description {
        if d.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(FieldError::field("description", DESCRIPTION_MESSAGE).with_value(d));
        }
    }

    let priority = match priority {
        Some(p) => match Priority::from_string(p) {
            Ok(p) => Some(p),
            Err(_) => {
                errors.push(FieldError::field("priority", PRIORITY_MESSAGE).with_value(p));
                None
            }
        },
        None => None,
    };

    let due_date = match due_date {
        Some(d) => match parse_due_date(d) {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(FieldError::field("dueDate", DUE_DATE_MESSAGE).with_value(d));
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CheckedFields {
        title: title.to_string(),
        description: description.map(str::to_string),
        priority,
        due_date,
    })
}
