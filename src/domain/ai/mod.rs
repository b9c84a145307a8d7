pub mod client;
pub mod dto;
pub mod prompt;
pub mod retry;

pub use client::{parse_completion, CompletionClient, UpstageClient};
pub use prompt::{PromptTemplate, TemplateKind, TemplateRegistry};
pub use retry::{maybe_retrying, RetryingClient};
