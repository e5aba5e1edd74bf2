//! 作成・編集フォーム
//!
//! サーバーと同じ長さ制限に加えて、期限日が今日より前でないことを確認する
//! （この規則はクライアントのみ）。

use chrono::NaiveDate;
use domain::{
    CreateTodoRequest, Priority, Todo, UpdateTodoRequest, DESCRIPTION_MAX_CHARS,
    DUE_DATE_MESSAGE, TITLE_MAX_CHARS,
};

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title cannot exceed 100 characters";
pub const DESCRIPTION_TOO_LONG: &str = "Description cannot exceed 500 characters";
pub const DUE_DATE_IN_PAST: &str = "Due date cannot be in the past";

/// フォームの入力値。期限日は `YYYY-MM-DD`（空なら未設定）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
}

/// フィールドごとのエラー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub due_date: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }

    /// `field: message` の行として列挙する
    pub fn lines(&self) -> Vec<String> {
        [
            ("title", self.title),
            ("description", self.description),
            ("dueDate", self.due_date),
        ]
        .into_iter()
        .filter_map(|(field, msg)| msg.map(|m| format!("{field}: {m}")))
        .collect()
    }
}

impl TodoForm {
    /// 既存の Todo で初期化（編集モーダル）
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            priority: todo.priority,
            due_date: todo
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.title = Some(TITLE_REQUIRED);
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.title = Some(TITLE_TOO_LONG);
        }

        if self.description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
            errors.description = Some(DESCRIPTION_TOO_LONG);
        }

        let due_date = self.due_date.trim();
        if !due_date.is_empty() {
            match NaiveDate::parse_from_str(due_date, "%Y-%m-%d") {
                Ok(date) if date < today => errors.due_date = Some(DUE_DATE_IN_PAST),
                Ok(_) => {}
                Err(_) => errors.due_date = Some(DUE_DATE_MESSAGE),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn description_opt(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }

    fn due_date_opt(&self) -> Option<String> {
        let due_date = self.due_date.trim();
        (!due_date.is_empty()).then(|| due_date.to_string())
    }

    /// 作成リクエスト。空の説明と期限日は送らない。
    pub fn to_create_request(&self) -> CreateTodoRequest {
        CreateTodoRequest {
            title: self.title.clone(),
            description: self.description_opt(),
            priority: Some(self.priority.as_str().to_string()),
            due_date: self.due_date_opt(),
        }
    }

    /// 更新リクエスト。説明は空でも送り、消去できるようにする。
    pub fn to_update_request(&self) -> UpdateTodoRequest {
        UpdateTodoRequest {
            title: self.title.clone(),
            description: Some(self.description.trim().to_string()),
            priority: Some(self.priority.as_str().to_string()),
            due_date: self.due_date_opt(),
            completed: None,
        }
    }
}
