//! Model clients

mod base;
mod claude;
mod custom;
mod gemini;
mod openai;

pub use base::HttpClientBase;
pub use claude::ClaudeClient;
pub use custom::CustomHttpClient;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
