pub mod app;
pub mod clipboard;
pub mod filter;
pub mod headless;
pub mod labels;
pub mod models;
pub mod query;
pub mod render;
pub mod scroll;
pub mod storage;
pub mod tags;

pub use app::{App, AppState, UiEvent};
pub use filter::{filter_prompts, FilterState, FilterSummary, ALL_TAG};
pub use models::prompt::Prompt;
pub use render::{Affordance, ButtonKey};
