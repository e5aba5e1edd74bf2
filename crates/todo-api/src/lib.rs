//! Todo REST API（axum）
//!
//! `/health` と `/api/todos` 以下の CRUD・トグル・集計エンドポイントを提供します。
//! 永続化は `TodoRepository` を注入して差し替えます。

pub mod error;
pub mod handlers;

use axum::{
    http::{header, Method},
    routing::{get, patch},
    Router,
};
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

/// InMemory ストアでルータを構築して返します。
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    let todos = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/stats/summary", get(handlers::todo_stats))
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/:id/toggle", patch(handlers::toggle_todo));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", todos)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryTodoRepository::new()))
    }
}
