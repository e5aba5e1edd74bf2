use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use domain::{NewTodo, Priority, SortOrder, Todo, TodoChanges, TodoFilter, TodoId, TodoSort};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use shared::{Config, DEFAULT_DATABASE};

use crate::error::StoreError;
use crate::repository::TodoRepository;

pub const COLLECTION: &str = "todos";

/// MongoDB の `todos` コレクションを使うリポジトリ
///
/// プロセス起動時に `connect` で生成し、終了時に `shutdown` で閉じる。
#[derive(Clone)]
pub struct MongoTodoRepository {
    client: Client,
    collection: Collection<Document>,
}

impl MongoTodoRepository {
    /// 接続文字列の既定データベース（なければ `todolist`）に接続し、ping で疎通を確認
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongodb_uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %database.name(), "Connected to MongoDB");

        Ok(Self {
            collection: database.collection::<Document>(COLLECTION),
            client,
        })
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB client shut down");
    }

    async fn find_by_object_id(&self, oid: ObjectId) -> Result<Document, StoreError> {
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| StoreError::NotFound(oid.to_hex()))
    }

    async fn set_and_return(
        &self,
        oid: ObjectId,
        update: Document,
    ) -> Result<Todo, StoreError> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::NotFound(oid.to_hex()))?;
        document_to_todo(&updated)
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn list(&self, filter: TodoFilter, sort: TodoSort) -> Result<Vec<Todo>, StoreError> {
        let direction = match sort.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        let mut sort_document = Document::new();
        sort_document.insert(sort.field.as_str(), direction);

        let documents: Vec<Document> = self
            .collection
            .find(filter_document(&filter))
            .sort(sort_document)
            .await?
            .try_collect()
            .await?;

        documents.iter().map(document_to_todo).collect()
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, StoreError> {
        let document = self.find_by_object_id(object_id(id)?).await?;
        document_to_todo(&document)
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let oid = ObjectId::new();
        let id = TodoId::from_string(oid.to_hex())
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        let todo = Todo::create(id, new, now());
        let document = todo_to_document(oid, &todo);

        self.collection.insert_one(document.clone()).await?;
        tracing::debug!(todo_id = %todo.id, "Inserted todo document");

        // ミリ秒精度に揃えた保存内容を返す
        document_to_todo(&document)
    }

    async fn update(&self, id: &TodoId, changes: TodoChanges) -> Result<Todo, StoreError> {
        let oid = object_id(id)?;
        let mut set = doc! {
            "title": changes.title,
            "updatedAt": to_bson_datetime(&now()),
        };
        let mut unset = Document::new();

        match changes.description {
            Some(Some(description)) => {
                set.insert("description", description);
            }
            Some(None) => {
                unset.insert("description", "");
            }
            None => {}
        }
        if let Some(priority) = changes.priority {
            set.insert("priority", priority.as_str());
        }
        if let Some(due_date) = changes.due_date {
            set.insert("dueDate", to_bson_datetime(&due_date));
        }
        if let Some(completed) = changes.completed {
            set.insert("completed", completed);
        }

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        self.set_and_return(oid, update).await
    }

    async fn toggle(&self, id: &TodoId) -> Result<Todo, StoreError> {
        let oid = object_id(id)?;
        let current = document_to_todo(&self.find_by_object_id(oid).await?)?;

        let update = doc! {
            "$set": {
                "completed": !current.completed,
                "updatedAt": to_bson_datetime(&now()),
            }
        };
        self.set_and_return(oid, update).await
    }

    async fn delete(&self, id: &TodoId) -> Result<(), StoreError> {
        let oid = object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, filter: TodoFilter) -> Result<u64, StoreError> {
        Ok(self
            .collection
            .count_documents(filter_document(&filter))
            .await?)
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        tracing::error!("MongoDB error: {:?}", e);
        StoreError::Database(e.to_string())
    }
}

/// ObjectId として解釈できない ID は存在しないものとして扱う
fn object_id(id: &TodoId) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id.as_str()).map_err(|_| StoreError::NotFound(id.to_string()))
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn filter_document(filter: &TodoFilter) -> Document {
    let mut document = Document::new();
    if let Some(completed) = filter.completed {
        document.insert("completed", completed);
    }
    if let Some(priority) = filter.priority {
        document.insert("priority", priority.as_str());
    }
    document
}

fn to_bson_datetime(dt: &DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: &BsonDateTime) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(dt.timestamp_millis())
        .ok_or_else(|| StoreError::Corrupted(format!("timestamp out of range: {dt}")))
}

pub(crate) fn todo_to_document(oid: ObjectId, todo: &Todo) -> Document {
    let mut document = doc! {
        "_id": oid,
        "title": todo.title.clone(),
        "completed": todo.completed,
        "priority": todo.priority.as_str(),
        "createdAt": to_bson_datetime(&todo.created_at),
        "updatedAt": to_bson_datetime(&todo.updated_at),
    };
    if let Some(description) = &todo.description {
        document.insert("description", description.clone());
    }
    if let Some(due_date) = &todo.due_date {
        document.insert("dueDate", to_bson_datetime(due_date));
    }
    document
}

pub(crate) fn document_to_todo(document: &Document) -> Result<Todo, StoreError> {
    let invalid = |field: &str| StoreError::Corrupted(format!("missing or invalid field: {field}"));

    let oid = document.get_object_id("_id").map_err(|_| invalid("_id"))?;
    let priority = match document.get_str("priority") {
        Ok(p) => Priority::from_string(p).map_err(|_| invalid("priority"))?,
        Err(_) => Priority::default(),
    };
    let due_date = match document.get_datetime("dueDate") {
        Ok(dt) => Some(from_bson_datetime(dt)?),
        Err(_) => None,
    };

    Ok(Todo {
        id: TodoId::from_string(oid.to_hex()).map_err(|_| invalid("_id"))?,
        title: document
            .get_str("title")
            .map_err(|_| invalid("title"))?
            .to_string(),
        description: document.get_str("description").ok().map(str::to_string),
        completed: document.get_bool("completed").unwrap_or(false),
        priority,
        due_date,
        created_at: from_bson_datetime(
            document
                .get_datetime("createdAt")
                .map_err(|_| invalid("createdAt"))?,
        )?,
        updated_at: from_bson_datetime(
            document
                .get_datetime("updatedAt")
                .map_err(|_| invalid("updatedAt"))?,
        )?,
    })
}
