//! UI の状態コンテナ
//!
//! 変更操作はサーバーの応答を待ってから一覧と統計を丸ごと取り直す。
//! ローカルでの楽観的な書き換えは行わない。失敗はトーストとして積み、
//! 直前の一覧・統計はそのまま残す。

use domain::{Todo, TodoId, TodoStats};
use std::fmt;

use crate::api::{ClientError, TodoApiClient};
use crate::components::{TodoForm, UiFilters};

pub const CREATED: &str = "Todo created successfully!";
pub const UPDATED: &str = "Todo updated successfully!";
pub const DELETED: &str = "Todo deleted successfully!";
pub const FETCH_FAILED: &str = "Failed to fetch todos";
pub const CREATE_FAILED: &str = "Failed to create todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const TOGGLE_FAILED: &str = "Failed to toggle todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// 一時的な通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: &str) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
        };
        write!(f, "{icon} {}", self.message)
    }
}

/// 開いているモーダル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Create,
    Edit(Todo),
}

pub struct TodoApp {
    client: TodoApiClient,
    todos: Vec<Todo>,
    stats: Option<TodoStats>,
    filters: UiFilters,
    loading: bool,
    modal: Option<Modal>,
    toasts: Vec<Toast>,
}

impl TodoApp {
    /// 初回の取得までは読み込み中として扱う
    pub fn new(client: TodoApiClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            stats: None,
            filters: UiFilters::default(),
            loading: true,
            modal: None,
            toasts: Vec::new(),
        }
    }

    pub fn client(&self) -> &TodoApiClient {
        &self.client
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn stats(&self) -> Option<&TodoStats> {
        self.stats.as_ref()
    }

    pub fn filters(&self) -> &UiFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// 積まれたトーストを取り出して空にする
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// 一覧と統計を取り直す
    pub async fn refresh(&mut self) {
        self.fetch_todos().await;
        self.fetch_stats().await;
    }

    async fn fetch_todos(&mut self) {
        self.loading = true;
        match self.client.get_todos(&self.filters.to_query()).await {
            Ok(todos) => self.todos = todos,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching todos");
                self.toasts.push(Toast::error(FETCH_FAILED));
            }
        }
        self.loading = false;
    }

    async fn fetch_stats(&mut self) {
        match self.client.get_stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => tracing::error!(error = %e, "Error fetching stats"),
        }
    }

    /// フィルタを変更して取り直す
    pub async fn set_filters(&mut self, filters: UiFilters) {
        self.filters = filters;
        self.refresh().await;
    }

    pub fn open_create(&mut self) {
        self.modal = Some(Modal::Create);
    }

    pub fn open_edit(&mut self, todo: Todo) {
        self.modal = Some(Modal::Edit(todo));
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// 検証済みのフォームを送信する
    ///
    /// 編集モーダルなら更新、それ以外は作成。成功時はモーダルを閉じる。
    pub async fn submit_form(&mut self, form: &TodoForm) -> Result<Todo, ClientError> {
        match self.modal.clone() {
            Some(Modal::Edit(todo)) => self.update(&todo.id, form).await,
            _ => self.create(form).await,
        }
    }

    async fn create(&mut self, form: &TodoForm) -> Result<Todo, ClientError> {
        match self.client.create_todo(&form.to_create_request()).await {
            Ok(todo) => {
                self.toasts.push(Toast::success(CREATED));
                self.modal = None;
                self.refresh().await;
                Ok(todo)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating todo");
                self.toasts.push(Toast::error(CREATE_FAILED));
                Err(e)
            }
        }
    }

    async fn update(&mut self, id: &TodoId, form: &TodoForm) -> Result<Todo, ClientError> {
        match self.client.update_todo(id, &form.to_update_request()).await {
            Ok(todo) => {
                self.toasts.push(Toast::success(UPDATED));
                self.modal = None;
                self.refresh().await;
                Ok(todo)
            }
            Err(e) => {
                tracing::error!(error = %e, todo_id = %id, "Error updating todo");
                self.toasts.push(Toast::error(UPDATE_FAILED));
                Err(e)
            }
        }
    }

    /// 完了状態を反転する（成功時のトーストはなし）
    pub async fn toggle(&mut self, id: &TodoId) -> Result<Todo, ClientError> {
        match self.client.toggle_todo(id).await {
            Ok(todo) => {
                self.refresh().await;
                Ok(todo)
            }
            Err(e) => {
                tracing::error!(error = %e, todo_id = %id, "Error toggling todo");
                self.toasts.push(Toast::error(TOGGLE_FAILED));
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, id: &TodoId) -> Result<(), ClientError> {
        match self.client.delete_todo(id).await {
            Ok(()) => {
                self.toasts.push(Toast::success(DELETED));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, todo_id = %id, "Error deleting todo");
                self.toasts.push(Toast::error(DELETE_FAILED));
                Err(e)
            }
        }
    }
}
