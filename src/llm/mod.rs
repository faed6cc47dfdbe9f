mod client;
mod completion;
mod types;

pub use client::{GeminiClient, LlmClient};
pub use completion::*;
pub use types::*;
