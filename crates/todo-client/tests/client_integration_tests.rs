//! 実際のルータをエフェメラルポートで起動し、クライアントと状態コンテナを通して検証する

use chrono::NaiveDate;
use domain::{CreateTodoRequest, Priority, SortField, TodoId, TodoListQuery};
use infrastructure::InMemoryTodoRepository;
use std::sync::Arc;
use todo_api::{app_with_state, AppState};
use todo_client::components::{render_list, PriorityFilter, StatusFilter, TodoForm, UiFilters};
use todo_client::state::{
    CREATED, DELETED, DELETE_FAILED, FETCH_FAILED, TOGGLE_FAILED, UPDATED,
};
use todo_client::{Modal, Toast, TodoApiClient, TodoApp};

async fn spawn_server() -> (TodoApiClient, Arc<InMemoryTodoRepository>) {
    let repo = Arc::new(InMemoryTodoRepository::new());
    let app = app_with_state(AppState::new(repo.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    (
        TodoApiClient::with_http(format!("http://{addr}/api"), http),
        repo,
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 15).unwrap()
}

fn form(title: &str, priority: Priority) -> TodoForm {
    TodoForm {
        title: title.to_string(),
        priority,
        ..Default::default()
    }
}

fn titles(app: &TodoApp) -> Vec<&str> {
    app.todos().iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test]
async fn api_client_round_trip() {
    let (client, _) = spawn_server().await;

    let created = client
        .create_todo(&CreateTodoRequest {
            title: "Buy milk".into(),
            due_date: Some("2030-02-01".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.priority, Priority::Medium);
    assert!(!created.completed);

    assert_eq!(client.get_todo(&created.id).await.unwrap(), created);
    assert!(client.toggle_todo(&created.id).await.unwrap().completed);

    let stats = client.get_stats().await.unwrap();
    assert_eq!((stats.total, stats.completed, stats.pending), (1, 1, 0));

    let pending = client
        .get_todos(&TodoListQuery {
            status: Some("pending".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(pending.is_empty());

    client.delete_todo(&created.id).await.unwrap();
    assert!(client.get_todo(&created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn validation_failure_surfaces_as_status_error() {
    let (client, _) = spawn_server().await;
    let err = client
        .create_todo(&CreateTodoRequest::titled(""))
        .await
        .unwrap_err();
    assert_eq!(
        err.server_messages(),
        vec!["Title is required and must be between 1 and 100 characters"]
    );
    match err {
        todo_client::ClientError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("\"path\":\"title\""));
            assert!(body.contains("\"value\":\"\""));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn create_refreshes_list_and_stats_and_closes_modal() {
    let (client, _) = spawn_server().await;
    let mut app = TodoApp::new(client);
    app.refresh().await;
    assert!(!app.is_loading());
    assert!(app.todos().is_empty());

    app.open_create();
    let todo = app.submit_form(&form("Buy milk", Priority::High)).await.unwrap();

    assert_eq!(app.modal(), None);
    assert_eq!(titles(&app), vec!["Buy milk"]);
    assert_eq!(app.stats().unwrap().high_priority, 1);
    assert_eq!(app.take_toasts(), vec![Toast::success(CREATED)]);
    assert!(app.toasts().is_empty());
    assert_eq!(todo.title, "Buy milk");
}

#[tokio::test]
async fn edit_updates_through_modal() {
    let (client, _) = spawn_server().await;
    let mut app = TodoApp::new(client);

    app.open_create();
    let todo = app
        .submit_form(&TodoForm {
            description: "2 litres".into(),
            ..form("Buy milk", Priority::Low)
        })
        .await
        .unwrap();
    app.take_toasts();

    app.open_edit(todo.clone());
    let mut edit = TodoForm::from_todo(&todo);
    edit.title = "Buy oat milk".into();
    edit.description = String::new();
    let updated = app.submit_form(&edit).await.unwrap();

    assert_eq!(updated.id, todo.id);
    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.description, None);
    assert_eq!(app.modal(), None);
    assert_eq!(titles(&app), vec!["Buy oat milk"]);
    assert_eq!(app.take_toasts(), vec![Toast::success(UPDATED)]);
}

#[tokio::test]
async fn toggle_has_no_success_toast_and_delete_has_one() {
    let (client, _) = spawn_server().await;
    let mut app = TodoApp::new(client);
    app.open_create();
    let todo = app.submit_form(&form("x", Priority::Medium)).await.unwrap();
    app.take_toasts();

    app.toggle(&todo.id).await.unwrap();
    assert!(app.take_toasts().is_empty());
    assert!(app.todos()[0].completed);
    assert_eq!(app.stats().unwrap().completed, 1);

    app.delete(&todo.id).await.unwrap();
    assert_eq!(app.take_toasts(), vec![Toast::success(DELETED)]);
    assert!(app.todos().is_empty());
    assert_eq!(app.stats().unwrap().total, 0);
}

#[tokio::test]
async fn failures_become_error_toasts_and_keep_previous_state() {
    let (client, repo) = spawn_server().await;
    let mut app = TodoApp::new(client);
    app.open_create();
    let todo = app.submit_form(&form("keep me", Priority::Medium)).await.unwrap();
    app.take_toasts();

    let missing = TodoId::from_string("01ARZ3NDEKTSV4RRFFQ69G5FAV".into()).unwrap();
    assert!(app.delete(&missing).await.unwrap_err().is_not_found());
    assert_eq!(app.take_toasts(), vec![Toast::error(DELETE_FAILED)]);

    repo.set_failure(Some("connection refused"));
    assert!(app.toggle(&todo.id).await.is_err());
    app.refresh().await;
    assert_eq!(
        app.take_toasts(),
        vec![Toast::error(TOGGLE_FAILED), Toast::error(FETCH_FAILED)]
    );
    assert_eq!(titles(&app), vec!["keep me"]);
    assert_eq!(app.stats().unwrap().total, 1);
    assert!(!app.is_loading());
}

#[tokio::test]
async fn filter_changes_refetch_with_query() {
    let (client, _) = spawn_server().await;
    let mut app = TodoApp::new(client);
    for (title, priority) in [("b", Priority::High), ("a", Priority::High), ("c", Priority::Low)] {
        app.open_create();
        app.submit_form(&form(title, priority)).await.unwrap();
    }
    let done = app.todos().iter().find(|t| t.title == "c").unwrap().id.clone();
    app.toggle(&done).await.unwrap();

    let filters = UiFilters::default()
        .with_status(StatusFilter::Pending)
        .with_priority(PriorityFilter::Only(Priority::High))
        .with_sort_by(SortField::Title)
        .toggle_order();
    app.set_filters(filters).await;
    assert_eq!(titles(&app), vec!["a", "b"]);

    app.set_filters(UiFilters::default().with_status(StatusFilter::Completed)).await;
    assert_eq!(titles(&app), vec!["c"]);
    assert_eq!(app.stats().unwrap().total, 3);

    let rendered = render_list(app.todos(), app.is_loading(), today());
    assert!(rendered.starts_with("[x] c  (low)"));
}

#[tokio::test]
async fn submit_without_modal_creates() {
    let (client, _) = spawn_server().await;
    let mut app = TodoApp::new(client);
    assert_eq!(app.modal(), None);
    app.submit_form(&form("direct", Priority::Low)).await.unwrap();
    assert_eq!(titles(&app), vec!["direct"]);

    let first = app.todos()[0].clone();
    app.open_edit(first);
    assert!(matches!(app.modal(), Some(Modal::Edit(_))));
}
