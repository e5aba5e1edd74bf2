use chrono::{DateTime, NaiveDate, Utc};
use domain::Todo;
use std::fmt::Write;

pub const LOADING_MESSAGE: &str = "Loading todos...";
pub const EMPTY_TITLE: &str = "No todos found";
pub const EMPTY_HINT: &str = "Create your first todo to get started!";

/// `Jan 5, 2030` 形式
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// 1 件分の表示
///
/// 期限切れ判定は `today` と比較する（当日は期限切れではない）。
pub fn render_item(todo: &Todo, today: NaiveDate) -> String {
    let mut out = String::new();
    let marker = if todo.completed { "[x]" } else { "[ ]" };
    let _ = writeln!(out, "{marker} {}  ({})", todo.title, todo.priority);
    if let Some(description) = &todo.description {
        let _ = writeln!(out, "    {description}");
    }

    let _ = write!(out, "    Created {}", format_date(&todo.created_at));
    if let Some(due) = &todo.due_date {
        let _ = write!(out, " | Due {}", format_date(due));
        if todo.is_overdue(today) {
            out.push_str(" (overdue)");
        }
    }
    let _ = write!(out, "\n    id: {}", todo.id);
    out
}

/// 一覧の表示（読み込み中・空の状態を含む）
pub fn render_list(todos: &[Todo], loading: bool, today: NaiveDate) -> String {
    if loading {
        return LOADING_MESSAGE.to_string();
    }
    if todos.is_empty() {
        return format!("{EMPTY_TITLE}\n{EMPTY_HINT}");
    }
    todos
        .iter()
        .map(|todo| render_item(todo, today))
        .collect::<Vec<_>>()
        .join("\n\n")
}
