//! Commit message suggestions from the Gemini API.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::{GeminiClient, Suggester};
pub use prompt::{build_prompt, rewrite_intent};
pub use response::clean_suggestion;
