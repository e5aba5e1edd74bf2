use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoChanges, TodoFilter, TodoId, TodoSort, TodoStats};

use crate::error::StoreError;

/// Todo コレクションに対する操作
///
/// 実装は 1 件 1 ドキュメントで保存する。該当 ID がない操作は
/// `StoreError::NotFound` を返す。一致 0 件の一覧はエラーではない。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 絞り込み・並び替えて一覧を取得
    async fn list(&self, filter: TodoFilter, sort: TodoSort) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: &TodoId) -> Result<Todo, StoreError>;

    /// ID・タイムスタンプ・completed=false を付与して保存
    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError>;

    /// 指定フィールドを置き換え、updatedAt を更新
    async fn update(&self, id: &TodoId, changes: TodoChanges) -> Result<Todo, StoreError>;

    /// 読み取り → 反転 → 書き込み。同一 ID への同時トグルは後勝ち。
    async fn toggle(&self, id: &TodoId) -> Result<Todo, StoreError>;

    async fn delete(&self, id: &TodoId) -> Result<(), StoreError>;

    async fn count(&self, filter: TodoFilter) -> Result<u64, StoreError>;

    /// 4 種類の件数を集計
    async fn stats(&self) -> Result<TodoStats, StoreError> {
        let [total, completed, pending, high_priority] = TodoStats::filters();
        Ok(TodoStats {
            total: self.count(total).await?,
            completed: self.count(completed).await?,
            pending: self.count(pending).await?,
            high_priority: self.count(high_priority).await?,
        })
    }
}
