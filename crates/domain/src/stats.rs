use crate::query::TodoFilter;
use crate::todo::Priority;
use serde::{Deserialize, Serialize};

/// GET /todos/stats/summary のレスポンス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    /// 未完了かつ優先度 high の件数
    pub high_priority: u64,
}

impl TodoStats {
    /// 集計に使う 4 つの絞り込み条件（total, completed, pending, highPriority の順）
    pub fn filters() -> [TodoFilter; 4] {
        [
            TodoFilter::all(),
            TodoFilter::completed(true),
            TodoFilter::completed(false),
            TodoFilter::completed(false).with_priority(Priority::High),
        ]
    }

    /// 完了率（%）。total が 0 のときは 0。
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}
