//! Todo API のクライアント側
//!
//! - `api`: HTTP クライアント
//! - `state`: 一覧・統計・フィルタ・モーダル・トーストを保持する状態コンテナ
//! - `components`: 状態から端末向けテキストを描画するコンポーネント

pub mod api;
pub mod components;
pub mod state;

pub use api::{ClientError, TodoApiClient};
pub use state::{Modal, Toast, ToastKind, TodoApp};
