//! LLM client abstractions and implementations

pub mod client;
pub mod message;
pub mod providers;

pub use client::{ChatOptions, FinishReason, LlmClient, LlmResponse, Usage};
pub use message::{LlmMessage, MessageRole};
pub use providers::*;
