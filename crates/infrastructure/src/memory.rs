use async_trait::async_trait;
use chrono::Utc;
use domain::{NewTodo, SortField, SortOrder, Todo, TodoChanges, TodoFilter, TodoId, TodoSort};
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::repository::TodoRepository;

/// 簡易な InMemory 実装（開発/テスト用）
///
/// 並び順はドキュメントストアと同じく保存形式で比較する
/// （priority は文字列順、未設定の値は昇順で先頭）。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    // 挿入順を保持する
    todos: Mutex<Vec<Todo>>,
    // 設定されている間は全操作がこのメッセージで失敗する（障害の再現用）
    failure: Mutex<Option<String>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// ストア障害を再現する。`None` で解除。
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = message.map(str::to_string);
        }
    }

    fn todos(&self) -> Result<MutexGuard<'_, Vec<Todo>>, StoreError> {
        let failure = self
            .failure
            .lock()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;
        if let Some(message) = failure.as_ref() {
            return Err(StoreError::Database(message.clone()));
        }
        self.todos
            .lock()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))
    }
}

fn compare(a: &Todo, b: &Todo, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Completed => a.completed.cmp(&b.completed),
        SortField::Priority => a.priority.as_str().cmp(b.priority.as_str()),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
    }
}

fn find_mut<'a>(todos: &'a mut [Todo], id: &TodoId) -> Result<&'a mut Todo, StoreError> {
    todos
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self, filter: TodoFilter, sort: TodoSort) -> Result<Vec<Todo>, StoreError> {
        let mut out: Vec<Todo> = self
            .todos()?
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| compare(a, b, sort.field));
        // 同値の場合、降順では後から挿入したものが先
        if sort.order == SortOrder::Desc {
            out.reverse();
        }
        Ok(out)
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, StoreError> {
        self.todos()?
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let todo = Todo::create(TodoId::new(), new, Utc::now());
        self.todos()?.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, changes: TodoChanges) -> Result<Todo, StoreError> {
        let mut todos = self.todos()?;
        let todo = find_mut(&mut todos, id)?;
        todo.apply_changes(changes, Utc::now());
        Ok(todo.clone())
    }

    async fn toggle(&self, id: &TodoId) -> Result<Todo, StoreError> {
        let mut todos = self.todos()?;
        let todo = find_mut(&mut todos, id)?;
        todo.toggle(Utc::now());
        Ok(todo.clone())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        let mut todos = self.todos()?;
        let before = todos.len();
        todos.retain(|t| &t.id != id);
        if todos.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, filter: TodoFilter) -> Result<u64, StoreError> {
        Ok(self.todos()?.iter().filter(|t| filter.matches(t)).count() as u64)
    }
}
