use crate::todo::{NewTodo, TodoChanges};
use crate::validation::{check_fields, ValidationErrors};
use serde::{Deserialize, Serialize};

/// POST /todos リクエスト
///
/// 未知のフィールドは受け付けない。`priority` と `dueDate` は文字列のまま
/// 受け取り、検証でフィールド単位のエラーとして報告する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl CreateTodoRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// 検証して作成内容に変換する。空の説明は未指定として扱う。
    pub fn validate(self) -> Result<NewTodo, ValidationErrors> {
        let checked = check_fields(
            &self.title,
            self.description.as_deref(),
            self.priority.as_deref(),
            self.due_date.as_deref(),
        )?;

        Ok(NewTodo {
            title: checked.title,
            description: checked.description.filter(|d| !d.is_empty()),
            priority: checked.priority.unwrap_or_default(),
            due_date: checked.due_date,
        })
    }
}

/// PUT /todos/:id リクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    /// 検証して更新内容に変換する。空の説明は既存の説明の消去を意味する。
    pub fn validate(self) -> Result<TodoChanges, ValidationErrors> {
        let checked = check_fields(
            &self.title,
            self.description.as_deref(),
            self.priority.as_deref(),
            self.due_date.as_deref(),
        )?;

        Ok(TodoChanges {
            title: checked.title,
            description: checked
                .description
                .map(|d| if d.is_empty() { None } else { Some(d) }),
            priority: checked.priority,
            due_date: checked.due_date,
            completed: self.completed,
        })
    }
}
