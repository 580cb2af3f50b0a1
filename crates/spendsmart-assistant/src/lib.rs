//! spendsmart-assistant
//!
//! Best-effort helpers backed by a generative-language model: free-text
//! expense parsing, spending insights, and a finance-aware chat. Every
//! operation degrades to a fixed fallback instead of failing.

pub mod assistant;
pub mod chat;
pub mod draft;
pub mod error;
pub mod gemini;
pub mod model;

pub use assistant::{Assistant, AssistantLimits, CHAT_ERROR_REPLY, INSIGHTS_EMPTY, INSIGHTS_FAILED};
pub use chat::{ChatMessage, ChatSession, GREETING};
pub use draft::ExpenseDraft;
pub use error::AssistantError;
pub use gemini::GeminiClient;
pub use model::{GenerationRequest, LanguageModel, ResponseFormat, Role, Turn};
