// file: src/llm/mod.rs
// description: model transport and retry policy module exports
// reference: internal module structure

pub mod client;
pub mod retry;

pub use client::{ChatCompletionsClient, CompletionRequest, LlmTransport, ResponseSchema};
pub use retry::RetryPolicy;

#[cfg(test)]
pub(crate) mod testing;
