//! 一覧取得の絞り込み・並び替え条件

use crate::errors::DomainError;
use crate::todo::{Priority, Todo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 並び替えに使えるフィールド（保存形式のフィールド名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Description,
    Completed,
    Priority,
    DueDate,
}

impl SortField {
    pub fn from_string(field: &str) -> Result<Self, DomainError> {
        match field {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "description" => Ok(SortField::Description),
            "completed" => Ok(SortField::Completed),
            "priority" => Ok(SortField::Priority),
            "dueDate" => Ok(SortField::DueDate),
            _ => Err(DomainError::InvalidSortField(field.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::Priority => "priority",
            SortField::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` 以外はすべて降順
    pub fn from_query(order: &str) -> Self {
        if order == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// 単一フィールドの並び替え指定（既定は createdAt 降順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoSort {
    pub field: SortField,
    pub order: SortOrder,
}

/// 等値条件の論理積による絞り込み
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TodoFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.completed.map_or(true, |c| todo.completed == c)
            && self.priority.map_or(true, |p| todo.priority == p)
    }
}

/// GET /todos のクエリパラメータ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl TodoListQuery {
    /// 生のクエリ文字列のペアから組み立てる
    ///
    /// 同じキーが複数あれば最初の値を使う。空の値は未指定と同じ扱い。
    /// 知らないキーは無視する。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "status" => &mut query.status,
                "priority" => &mut query.priority,
                "sortBy" => &mut query.sort_by,
                "order" => &mut query.order,
                _ => continue,
            };
            if slot.is_none() {
                let value = value.into();
                if !value.is_empty() {
                    *slot = Some(value);
                }
            }
        }
        query
    }

    fn param(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// 絞り込み条件に変換する
    ///
    /// `status` は `completed` / `pending` 以外を無視する。空の `priority` は
    /// 未指定と同じ。既知の値でなければエラーを返す（呼び出し側は「一致なし」として扱う）。
    pub fn to_filter(&self) -> Result<TodoFilter, DomainError> {
        let completed = match Self::param(&self.status) {
            Some("completed") => Some(true),
            Some("pending") => Some(false),
            _ => None,
        };
        let priority = Self::param(&self.priority)
            .map(Priority::from_string)
            .transpose()?;
        Ok(TodoFilter {
            completed,
            priority,
        })
    }

    /// 並び替えフィールド。未指定なら createdAt。
    pub fn sort_field(&self) -> Result<SortField, DomainError> {
        Self::param(&self.sort_by).map_or(Ok(SortField::default()), SortField::from_string)
    }

    pub fn sort_order(&self) -> SortOrder {
        Self::param(&self.order).map_or(SortOrder::default(), SortOrder::from_query)
    }
}
