//! todo-cli: 端末から Todo API を操作するフロントエンド
//!
//! 各サブコマンドは状態コンテナを通して API を呼び、描画結果とトーストを出力します。

use anyhow::bail;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use domain::{Priority, SortField, SortOrder, TodoId};
use shared::ClientConfig;
use std::process::ExitCode;
use todo_client::components::{
    render_filter_bar, render_item, render_list, render_stats_card, PriorityFilter, StatusFilter,
    TodoForm, UiFilters, SORT_OPTIONS,
};
use todo_client::{TodoApiClient, TodoApp};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Manage todos through the todo API")]
struct Cli {
    /// API のベース URL（未指定なら TODO_API_URL、既定は http://localhost:5000/api）
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List todos
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        #[arg(long, default_value = "all")]
        priority: PriorityFilter,

        /// createdAt, title, dueDate or priority
        #[arg(long, default_value = "createdAt")]
        sort_by: SortField,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: String,
    },

    /// Show a single todo
    Show { id: String },

    /// Create a todo
    Add {
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        due: String,
    },

    /// Edit a todo (unspecified fields keep their current value)
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Flip the completion status
    Toggle { id: String },

    /// Delete a todo
    Delete { id: String },

    /// Show statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    shared::init_cli_tracing().map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    let cli = Cli::parse();
    let config = cli
        .api_url
        .map(|api_base_url| ClientConfig { api_base_url })
        .unwrap_or_else(ClientConfig::from_env);
    let mut app = TodoApp::new(TodoApiClient::from_config(&config));
    let today = Utc::now().date_naive();

    let ok = match cli.command {
        Commands::List {
            status,
            priority,
            sort_by,
            order,
        } => {
            if !SORT_OPTIONS.contains(&sort_by) {
                bail!("cannot sort by {sort_by}; use createdAt, title, dueDate or priority");
            }
            let filters = UiFilters {
                status,
                priority,
                sort_by,
                order: SortOrder::from_query(&order),
            };
            app.set_filters(filters).await;
            println!("{}\n", render_filter_bar(app.filters()));
            print_list(&app, today);
            true
        }
        Commands::Show { id } => {
            let id = parse_id(id)?;
            match app.client().get_todo(&id).await {
                Ok(todo) => {
                    println!("{}", render_item(&todo, today));
                    true
                }
                Err(e) if e.is_not_found() => {
                    eprintln!("Todo not found");
                    false
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Add {
            title,
            description,
            priority,
            due,
        } => {
            let form = TodoForm {
                title,
                description,
                priority,
                due_date: due,
            };
            app.open_create();
            submit(&mut app, &form, today).await
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            due,
        } => {
            let id = parse_id(id)?;
            let todo = match app.client().get_todo(&id).await {
                Ok(todo) => todo,
                Err(e) if e.is_not_found() => bail!("Todo not found"),
                Err(e) => return Err(e.into()),
            };
            let current = TodoForm::from_todo(&todo);
            let form = TodoForm {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                priority: priority.unwrap_or(current.priority),
                due_date: due.unwrap_or(current.due_date),
            };
            app.open_edit(todo);
            submit(&mut app, &form, today).await
        }
        Commands::Toggle { id } => {
            let id = parse_id(id)?;
            let ok = app.toggle(&id).await.is_ok();
            if ok {
                print_list(&app, today);
            }
            ok
        }
        Commands::Delete { id } => {
            let id = parse_id(id)?;
            let ok = app.delete(&id).await.is_ok();
            if ok {
                print_list(&app, today);
            }
            ok
        }
        Commands::Stats => {
            app.refresh().await;
            match app.stats() {
                Some(stats) => {
                    println!("{}", render_stats_card(stats));
                    true
                }
                None => false,
            }
        }
    };

    for toast in app.take_toasts() {
        eprintln!("{toast}");
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn parse_id(raw: String) -> anyhow::Result<TodoId> {
    Ok(TodoId::from_string(raw)?)
}

/// フォームを検証して送信する。検証エラーはフィールドごとに表示する。
async fn submit(app: &mut TodoApp, form: &TodoForm, today: NaiveDate) -> bool {
    if let Err(errors) = form.validate(today) {
        for line in errors.lines() {
            eprintln!("{line}");
        }
        app.close_modal();
        return false;
    }
    match app.submit_form(form).await {
        Ok(_) => {
            print_list(app, today);
            true
        }
        Err(e) => {
            for message in e.server_messages() {
                eprintln!("{message}");
            }
            false
        }
    }
}

fn print_list(app: &TodoApp, today: NaiveDate) {
    println!("{}", render_list(app.todos(), app.is_loading(), today));
}
