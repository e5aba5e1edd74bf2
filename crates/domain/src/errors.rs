use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid due date: {0}")]
    InvalidDueDate(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),
}
