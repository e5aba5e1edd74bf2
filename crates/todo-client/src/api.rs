use domain::{
    CreateTodoRequest, Todo, TodoId, TodoListQuery, TodoStats, UpdateTodoRequest,
    ValidationErrors,
};
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use shared::ClientConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// 404 / 500 の応答ボディ
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    /// サーバーが返したメッセージ
    ///
    /// 400 なら各フィールドの `msg` を順に、それ以外は `message` を返す。
    /// JSON として読めないボディや通信エラーでは空。
    pub fn server_messages(&self) -> Vec<String> {
        let ClientError::Status { body, .. } = self else {
            return Vec::new();
        };
        if let Ok(validation) = serde_json::from_str::<ValidationErrors>(body) {
            return validation.errors.into_iter().map(|e| e.msg).collect();
        }
        serde_json::from_str::<MessageBody>(body)
            .map(|b| vec![b.message])
            .unwrap_or_default()
    }
}

/// `/api` 以下のエンドポイントを呼び出すクライアント
#[derive(Debug, Clone)]
pub struct TodoApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    /// 既存の reqwest クライアントを使う（プロキシやタイムアウトを調整したい場合）
    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_todos(&self, query: &TodoListQuery) -> Result<Vec<Todo>, ClientError> {
        self.send_json(self.http.get(self.url("/todos")).query(query))
            .await
    }

    pub async fn get_todo(&self, id: &TodoId) -> Result<Todo, ClientError> {
        self.send_json(self.http.get(self.url(&format!("/todos/{id}"))))
            .await
    }

    pub async fn create_todo(&self, req: &CreateTodoRequest) -> Result<Todo, ClientError> {
        self.send_json(self.http.post(self.url("/todos")).json(req))
            .await
    }

    pub async fn update_todo(
        &self,
        id: &TodoId,
        req: &UpdateTodoRequest,
    ) -> Result<Todo, ClientError> {
        self.send_json(self.http.put(self.url(&format!("/todos/{id}"))).json(req))
            .await
    }

    pub async fn toggle_todo(&self, id: &TodoId) -> Result<Todo, ClientError> {
        self.send_json(self.http.patch(self.url(&format!("/todos/{id}/toggle"))))
            .await
    }

    pub async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/todos/{id}"))))
            .await?;
        Ok(())
    }

    pub async fn get_stats(&self) -> Result<TodoStats, ClientError> {
        self.send_json(self.http.get(self.url("/todos/stats/summary")))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "API request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}
