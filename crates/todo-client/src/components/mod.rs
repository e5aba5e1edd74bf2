//! 表示専用のコンポーネント。入力から文字列を組み立てるだけで状態を持たない。

pub mod filter_bar;
pub mod form;
pub mod list;
pub mod stats_card;

pub use filter_bar::{render_filter_bar, PriorityFilter, StatusFilter, UiFilters, SORT_OPTIONS};
pub use form::{FormErrors, TodoForm};
pub use list::{format_date, render_item, render_list};
pub use stats_card::render_stats_card;
