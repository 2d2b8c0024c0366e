//! The nine Ollama tool implementations, one file per endpoint family.

mod chat;
mod embed;
mod generate;
mod lifecycle;
mod models;

pub use chat::ChatTool;
pub use embed::EmbedTool;
pub use generate::GenerateTool;
pub use lifecycle::{CopyModelTool, DeleteModelTool, PullModelTool};
pub use models::{ListModelsTool, ListRunningModelsTool, ShowModelTool};
