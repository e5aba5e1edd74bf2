//! フィルタバー（状態・優先度・並び替えフィールド・昇降順の 4 つの独立したコントロール）

use domain::{DomainError, Priority, SortField, SortOrder, TodoListQuery};
use std::fmt;
use std::str::FromStr;

/// フィルタバーで選べる並び替えフィールド
pub const SORT_OPTIONS: [SortField; 4] = [
    SortField::CreatedAt,
    SortField::Title,
    SortField::DueDate,
    SortField::Priority,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Only(priority) => priority.as_str(),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(PriorityFilter::All);
        }
        Priority::from_string(s).map(PriorityFilter::Only)
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画面上のフィルタ状態（既定: all / all / createdAt / desc）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiFilters {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl UiFilters {
    /// 一覧 API のクエリに変換する。`all` は送らない。
    pub fn to_query(&self) -> TodoListQuery {
        let status = match self.status {
            StatusFilter::All => None,
            other => Some(other.as_str().to_string()),
        };
        let priority = match self.priority {
            PriorityFilter::All => None,
            PriorityFilter::Only(p) => Some(p.as_str().to_string()),
        };
        TodoListQuery {
            status,
            priority,
            sort_by: Some(self.sort_by.as_str().to_string()),
            order: Some(self.order.as_str().to_string()),
        }
    }

    pub fn with_status(self, status: StatusFilter) -> Self {
        Self { status, ..self }
    }

    pub fn with_priority(self, priority: PriorityFilter) -> Self {
        Self { priority, ..self }
    }

    pub fn with_sort_by(self, sort_by: SortField) -> Self {
        Self { sort_by, ..self }
    }

    pub fn toggle_order(self) -> Self {
        Self {
            order: self.order.toggled(),
            ..self
        }
    }
}

/// 現在の選択を 1 行で描画する
pub fn render_filter_bar(filters: &UiFilters) -> String {
    let arrow = match filters.order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };
    format!(
        "Status: {} | Priority: {} | Sort by: {} {} {}",
        filters.status,
        filters.priority,
        filters.sort_by,
        filters.order.as_str(),
        arrow
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_send_only_sort_parameters() {
        let query = UiFilters::default().to_query();
        assert_eq!(query.status, None);
        assert_eq!(query.priority, None);
        assert_eq!(query.sort_by.as_deref(), Some("createdAt"));
        assert_eq!(query.order.as_deref(), Some("desc"));
    }

    #[test]
    fn controls_are_independent() {
        let filters = UiFilters::default()
            .with_status(StatusFilter::Pending)
            .with_priority(PriorityFilter::Only(Priority::High))
            .with_sort_by(SortField::Title)
            .toggle_order();
        let query = filters.to_query();
        assert_eq!(query.status.as_deref(), Some("pending"));
        assert_eq!(query.priority.as_deref(), Some("high"));
        assert_eq!(query.sort_by.as_deref(), Some("title"));
        assert_eq!(query.order.as_deref(), Some("asc"));
        assert_eq!(filters.toggle_order().order, SortOrder::Desc);
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!("completed".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert!("done".parse::<StatusFilter>().is_err());
        assert_eq!("all".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "low".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::Low)
        );
    }

    #[test]
    fn renders_current_selection() {
        assert_eq!(
            render_filter_bar(&UiFilters::default()),
            "Status: all | Priority: all | Sort by: createdAt desc ↓"
        );
    }
}
