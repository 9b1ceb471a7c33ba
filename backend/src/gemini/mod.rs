//! Gemini module
//!
//! Wire types and the HTTP client for the Generative Language API.

pub mod client;
pub mod types;

pub use client::{GeminiClient, GenerationBackend};
pub use types::{Content, GenerateContentRequest, Part, TurnRole};
