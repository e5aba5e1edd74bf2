use axum::{
    extract::{rejection::QueryRejection, FromRequest, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{
    CreateTodoRequest, SortField, Todo, TodoId, TodoListQuery, TodoSort, TodoStats,
    UpdateTodoRequest,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

const FETCH_TODOS: &str = "Error fetching todos";
const FETCH_TODO: &str = "Error fetching todo";
const CREATE_TODO: &str = "Error creating todo";
const UPDATE_TODO: &str = "Error updating todo";
const TOGGLE_TODO: &str = "Error toggling todo";
const DELETE_TODO: &str = "Error deleting todo";
const FETCH_STATS: &str = "Error fetching stats";

/// JSON ボディ。未知/型違いのフィールドは `ApiError::MalformedBody` で 400 を返す
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct DeletedBody {
    message: &'static str,
}

/// 空の ID は保存されたドキュメントを指し得ないため 404
fn todo_id(raw: String) -> Result<TodoId, ApiError> {
    TodoId::from_string(raw).map_err(|_| ApiError::NotFound)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

/// GET /todos
///
/// クエリは寛容に解釈する。重複したキーは最初の値、空の値は未指定として扱い、
/// 解釈できないクエリ文字列は既定の条件で一覧を返す。
pub async fn list_todos(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let query = match pairs {
        Ok(Query(pairs)) => TodoListQuery::from_pairs(pairs),
        Err(e) => {
            tracing::warn!(error = %e, "Unparsable list query, using defaults");
            TodoListQuery::default()
        }
    };
    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(e) => {
            // 存在しない優先度との等値条件は何にも一致しない
            tracing::debug!(error = %e, "Unknown priority filter");
            return Ok(Json(Vec::new()));
        }
    };
    let field = query.sort_field().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unsupported sortBy, falling back to createdAt");
        SortField::default()
    });
    let sort = TodoSort {
        field,
        order: query.sort_order(),
    };

    let todos = state
        .repo
        .list(filter, sort)
        .await
        .map_err(ApiError::store(FETCH_TODOS))?;
    Ok(Json(todos))
}

/// GET /todos/:id
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(id)?;
    let todo = state
        .repo
        .get(&id)
        .await
        .map_err(ApiError::store(FETCH_TODO))?;
    Ok(Json(todo))
}

/// POST /todos
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = req.validate()?;
    let todo = state
        .repo
        .insert(new)
        .await
        .map_err(ApiError::store(CREATE_TODO))?;

    tracing::info!(todo_id = %todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /todos/:id
///
/// 検証は ID の存在確認より先に行う。
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let changes = req.validate()?;
    let id = todo_id(id)?;
    let todo = state
        .repo
        .update(&id, changes)
        .await
        .map_err(ApiError::store(UPDATE_TODO))?;

    tracing::info!(todo_id = %todo.id, "Todo updated");
    Ok(Json(todo))
}

/// PATCH /todos/:id/toggle
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(id)?;
    let todo = state
        .repo
        .toggle(&id)
        .await
        .map_err(ApiError::store(TOGGLE_TODO))?;

    tracing::info!(todo_id = %todo.id, completed = todo.completed, "Todo toggled");
    Ok(Json(todo))
}

/// DELETE /todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = todo_id(id)?;
    state
        .repo
        .delete(&id)
        .await
        .map_err(ApiError::store(DELETE_TODO))?;

    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(Json(DeletedBody {
        message: "Todo deleted successfully",
    }))
}

/// GET /todos/stats/summary
pub async fn todo_stats(State(state): State<AppState>) -> Result<Json<TodoStats>, ApiError> {
    let stats = state
        .repo
        .stats()
        .await
        .map_err(ApiError::store(FETCH_STATS))?;
    Ok(Json(stats))
}
