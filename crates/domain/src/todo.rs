use crate::errors::DomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Todo の識別子
///
/// ストアが作成時に採番する不透明な文字列。生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// ULID で新しい識別子を生成
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 文字列から識別子を作成
    pub fn from_string(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidTodoId(
                "Todo ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 優先度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// 文字列から優先度を作成（大文字小文字は区別する）
    pub fn from_string(priority: &str) -> Result<Self, DomainError> {
        match priority {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DomainError::InvalidPriority(priority.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Todo ドキュメント
///
/// 不変条件:
/// - `id` は生涯にわたって 1 件の Todo を指す
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 作成時の既定値（未完了、createdAt = updatedAt = now）で Todo を組み立てる
    pub fn create(id: TodoId, new: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            completed: false,
            priority: new.priority,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// 指定されたフィールドのみ置き換え、updatedAt を進める
    pub fn apply_changes(&mut self, changes: TodoChanges, now: DateTime<Utc>) {
        self.title = changes.title;
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.touch(now);
    }

    /// 完了フラグを反転する
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// 期限日が今日より前（同日は含まない）で、まだ完了していないか
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => !self.completed && due.date_naive() < today,
            None => false,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// 検証済みの作成内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date: None,
        }
    }
}

/// 検証済みの更新内容
///
/// `None` のフィールドは既存の値を保持する。`description` は
/// `Some(None)` で説明を消去する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

/// ISO-8601 の日付（`YYYY-MM-DD`）または日時を UTC に変換する
///
/// 日付のみの場合は UTC の 0 時として扱う。
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = value.parse::<NaiveDateTime>() {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::InvalidDueDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(now: DateTime<Utc>) -> Todo {
        Todo::create(TodoId::new(), NewTodo::titled("Buy milk"), now)
    }

    #[test]
    fn test_todo_id_new_generates_26_char_string() {
        let id = TodoId::new();
        assert_eq!(id.as_str().len(), 26);
    }

    #[test]
    fn test_todo_id_from_empty_string_is_rejected() {
        assert!(matches!(
            TodoId::from_string("  ".to_string()),
            Err(DomainError::InvalidTodoId(_))
        ));
    }

    #[test]
    fn test_priority_round_trips_through_str() {
        for p in Priority::ALL {
            assert_eq!(Priority::from_string(p.as_str()).unwrap(), p);
        }
        assert!(Priority::from_string("High").is_err());
        assert!(Priority::from_string("urgent").is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_create_applies_defaults() {
        let now = Utc::now();
        let todo = sample(now);
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.created_at, now);
        assert_eq!(todo.updated_at, now);
    }

    #[test]
    fn test_toggle_twice_restores_completed_and_refreshes_updated_at() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut todo = sample(created);
        todo.toggle(created + Duration::minutes(1));
        assert!(todo.completed);
        todo.toggle(created + Duration::minutes(2));
        assert!(!todo.completed);
        assert_eq!(todo.updated_at, created + Duration::minutes(2));
        assert_eq!(todo.created_at, created);
    }

    #[test]
    fn test_updated_at_never_precedes_created_at() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut todo = sample(created);
        todo.toggle(created - Duration::hours(1));
        assert_eq!(todo.updated_at, created);
    }

    #[test]
    fn test_apply_changes_keeps_fields_that_were_not_provided() {
        let now = Utc::now();
        let mut todo = Todo::create(
            TodoId::new(),
            NewTodo {
                title: "A".into(),
                description: Some("keep me".into()),
                priority: Priority::High,
                due_date: None,
            },
            now,
        );
        todo.apply_changes(
            TodoChanges {
                title: "B".into(),
                description: None,
                priority: None,
                due_date: None,
                completed: Some(true),
            },
            now,
        );
        assert_eq!(todo.title, "B");
        assert_eq!(todo.description.as_deref(), Some("keep me"));
        assert_eq!(todo.priority, Priority::High);
        assert!(todo.completed);
    }

    #[test]
    fn test_apply_changes_can_clear_description() {
        let now = Utc::now();
        let mut todo = sample(now);
        todo.description = Some("old".into());
        todo.apply_changes(
            TodoChanges {
                title: "A".into(),
                description: Some(None),
                priority: None,
                due_date: None,
                completed: None,
            },
            now,
        );
        assert_eq!(todo.description, None);
    }

    #[test]
    fn test_is_overdue_ignores_same_day_and_completed() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut todo = sample(Utc::now());

        todo.due_date = Some(parse_due_date("2025-03-09").unwrap());
        assert!(todo.is_overdue(today));

        todo.due_date = Some(parse_due_date("2025-03-10T18:00:00Z").unwrap());
        assert!(!todo.is_overdue(today));

        todo.due_date = Some(parse_due_date("2025-03-01").unwrap());
        todo.completed = true;
        assert!(!todo.is_overdue(today));
    }

    #[test]
    fn test_parse_due_date_accepts_date_and_datetime() {
        let date = parse_due_date("2025-12-31").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap());

        let dt = parse_due_date("2025-12-31T09:30:00+09:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 12, 31, 0, 30, 0).unwrap());

        assert!(parse_due_date("2025-12-31T09:30:00").is_ok());
        assert!(parse_due_date("2025-02-30").is_err());
        assert!(parse_due_date("tomorrow").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn test_todo_serializes_with_camel_case_fields() {
        let mut todo = sample(Utc::now());
        todo.due_date = Some(parse_due_date("2025-01-05").unwrap());
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("dueDate").is_some());
        assert_eq!(json["priority"], "medium");
        assert!(json.get("description").is_none());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn toggle_is_an_involution(start in any::<bool>(), minutes in 0i64..10_000) {
                let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
                let mut todo = sample(created);
                todo.completed = start;
                let before = todo.clone();

                todo.toggle(created + Duration::minutes(minutes));
                prop_assert_eq!(todo.completed, !start);
                todo.toggle(created + Duration::minutes(minutes + 1));

                prop_assert_eq!(todo.completed, start);
                prop_assert_eq!(&todo.title, &before.title);
                prop_assert_eq!(todo.priority, before.priority);
                prop_assert!(todo.updated_at >= todo.created_at);
            }
        }
    }
}
