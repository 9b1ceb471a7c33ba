//! Gemini API wire types
//!
//! Structs that mirror the `generateContent` JSON request and response
//! format. Requests serialize in the API's camelCase shape; responses are
//! decoded leniently so a missing candidate is an empty result, not an error.

use serde::{Deserialize, Serialize};

/// Role vocabulary used by the API for conversation turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Text written by the person chatting
    User,
    /// Text generated by the model
    Model,
}

/// Top-level `generateContent` request body
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Full conversation, oldest turn first
    pub contents: Vec<Content>,
    /// Sampling parameters
    pub generation_config: GenerationConfig,
    /// Content-safety thresholds
    pub safety_settings: Vec<SafetySetting>,
    /// Fixed system prompt
    pub system_instruction: SystemInstruction,
}

/// One role-tagged turn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Content {
    /// Who produced this turn
    pub role: TurnRole,
    /// Turn payload (always a single text part here)
    pub parts: Vec<Part>,
}

impl Content {
    /// Build a single-part text turn
    pub fn text(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// A text part for requests
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Part {
    /// The text content
    pub text: String,
}

/// System instruction wrapper (`{"parts": [{"text": ...}]}`)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SystemInstruction {
    /// Instruction parts
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    /// Wrap a prompt string
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: prompt.into(),
            }],
        }
    }
}

/// Sampling parameters (`generationConfig`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f64,
    /// Top-k cutoff
    pub top_k: u32,
    /// Nucleus sampling cutoff
    pub top_p: f64,
    /// Optional cap on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: None,
        }
    }
}

/// Harm categories the API can filter on
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    /// `HARM_CATEGORY_HARASSMENT`
    HarmCategoryHarassment,
    /// `HARM_CATEGORY_HATE_SPEECH`
    HarmCategoryHateSpeech,
    /// `HARM_CATEGORY_SEXUALLY_EXPLICIT`
    HarmCategorySexuallyExplicit,
    /// `HARM_CATEGORY_DANGEROUS_CONTENT`
    HarmCategoryDangerousContent,
}

/// Blocking thresholds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Block only high-probability harm
    BlockOnlyHigh,
    /// Block medium and high probability harm
    BlockMediumAndAbove,
    /// Block low, medium and high probability harm
    BlockLowAndAbove,
    /// Never block
    BlockNone,
}

/// One `safetySettings` entry
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetySetting {
    /// Category being filtered
    pub category: HarmCategory,
    /// Threshold applied to that category
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// The four categories, each blocked at medium and above
    pub fn block_medium_and_above() -> Vec<SafetySetting> {
        [
            HarmCategory::HarmCategoryHarassment,
            HarmCategory::HarmCategoryHateSpeech,
            HarmCategory::HarmCategorySexuallyExplicit,
            HarmCategory::HarmCategoryDangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        })
        .collect()
    }
}

/// Top-level Gemini API response
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate responses from the model (may be absent when blocked)
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if present and non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
    }
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content structure containing parts of the response
#[derive(Deserialize, Debug)]
pub struct CandidateContent {
    /// List of content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A single part of response content
#[derive(Deserialize, Debug)]
pub struct ResponsePart {
    /// The text content of this part
    #[serde(default)]
    pub text: Option<String>,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    /// Error details
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

/// Inner `error` object
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorDetail {
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Extract `error.message` from a raw body, falling back to "Unknown error"
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
