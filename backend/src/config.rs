//! Chat configuration
//!
//! Centralized configuration with environment variable support and
//! per-variant presets. The whole struct is handed to the session controller
//! and the client at construction; nothing reads process state afterwards.

use std::env;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MODEL, PERSONA_GREETING, PERSONA_MAX_OUTPUT_TOKENS,
    PERSONA_NAME, PERSONA_SYSTEM_PROMPT, TUTOR_GREETING, TUTOR_SYSTEM_PROMPT,
};
use crate::error::ChatError;
use crate::gemini::types::{GenerationConfig, SafetySetting};

/// Sampling parameters sent as `generationConfig`
pub type SamplingParams = GenerationConfig;

/// Which of the two chat front-ends is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatVariant {
    /// Data Structures and Algorithms tutor
    #[default]
    Tutor,
    /// Messenger-style persona chatbot
    Persona,
}

impl ChatVariant {
    /// Parse a variant name as used in `CHAT_VARIANT`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tutor" | "dsa" => Some(ChatVariant::Tutor),
            "persona" | "whatsapp" => Some(ChatVariant::Persona),
            _ => None,
        }
    }

    /// Window/header title
    pub fn title(&self) -> &'static str {
        match self {
            ChatVariant::Tutor => "DSA Instructor",
            ChatVariant::Persona => PERSONA_NAME,
        }
    }

    /// First assistant message of a fresh session
    pub fn greeting(&self) -> &'static str {
        match self {
            ChatVariant::Tutor => TUTOR_GREETING,
            ChatVariant::Persona => PERSONA_GREETING,
        }
    }

    /// Label shown while a reply is pending
    pub fn typing_label(&self) -> String {
        match self {
            ChatVariant::Tutor => "Typing...".to_string(),
            ChatVariant::Persona => format!("{} is typing...", PERSONA_NAME),
        }
    }

    /// Placeholder for the input field
    pub fn input_placeholder(&self) -> &'static str {
        match self {
            ChatVariant::Tutor => "Ask your DSA question...",
            ChatVariant::Persona => "Type a message...",
        }
    }

    /// Whether user messages carry a delivery status
    pub fn tracks_delivery(&self) -> bool {
        matches!(self, ChatVariant::Persona)
    }

    /// Whether messages are stamped with a wall-clock time
    pub fn stamps_messages(&self) -> bool {
        matches!(self, ChatVariant::Persona)
    }
}

/// Chat configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Generative Language API key (sent as the `key` query parameter)
    pub api_key: String,
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// Model name, e.g. "gemini-1.5-flash"
    pub model: String,
    /// Fixed system instruction
    pub system_prompt: String,
    /// Sampling parameters
    pub sampling: SamplingParams,
    /// Content-safety thresholds
    pub safety_settings: Vec<SafetySetting>,
    /// Front-end variant
    pub variant: ChatVariant,
}

impl ChatConfig {
    /// Preset matching one of the two front-ends
    pub fn for_variant(variant: ChatVariant, api_key: impl Into<String>) -> Self {
        let (system_prompt, max_output_tokens) = match variant {
            ChatVariant::Tutor => (TUTOR_SYSTEM_PROMPT, None),
            ChatVariant::Persona => (PERSONA_SYSTEM_PROMPT, Some(PERSONA_MAX_OUTPUT_TOKENS)),
        };

        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: system_prompt.to_string(),
            sampling: SamplingParams {
                max_output_tokens,
                ..Default::default()
            },
            safety_settings: SafetySetting::block_medium_and_above(),
            variant,
        }
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Recognized keys: `GEMINI_API_KEY`, `CHAT_VARIANT`, `GEMINI_MODEL`,
    /// `GEMINI_API_BASE_URL`. Unknown variants fall back to the tutor.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let variant = lookup("CHAT_VARIANT")
            .and_then(|v| ChatVariant::parse(&v))
            .unwrap_or_default();
        let mut config = Self::for_variant(variant, lookup("GEMINI_API_KEY").unwrap_or_default());

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        if let Some(url) = lookup("GEMINI_API_BASE_URL").filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        config
    }

    /// Full `generateContent` endpoint (without the key)
    pub fn model_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model
        )
    }

    /// Check that the configuration can be used to talk to the API
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::EmptyApiKey);
        }
        if self.model.is_empty() {
            return Err(ChatError::InvalidConfig("model cannot be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.sampling.temperature) {
            return Err(ChatError::InvalidConfig(
                "temperature must be within [0, 2]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sampling.top_p) {
            return Err(ChatError::InvalidConfig(
                "top_p must be within [0, 1]".to_string(),
            ));
        }
        if self.sampling.top_k == 0 {
            return Err(ChatError::InvalidConfig("top_k must be > 0".to_string()));
        }
        if self.sampling.max_output_tokens == Some(0) {
            return Err(ChatError::InvalidConfig(
                "max_output_tokens must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::types::HarmBlockThreshold;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_tutor_preset() {
        let config = ChatConfig::for_variant(ChatVariant::Tutor, "k");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.sampling.temperature, 0.7);
        assert_eq!(config.sampling.top_k, 40);
        assert_eq!(config.sampling.top_p, 0.95);
        assert_eq!(config.sampling.max_output_tokens, None);
        assert!(config.system_prompt.contains("Data Structures and Algorithms"));
        assert_eq!(config.safety_settings.len(), 4);
        assert!(config
            .safety_settings
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove));
    }

    #[test]
    fn test_persona_preset_caps_tokens() {
        let config = ChatConfig::for_variant(ChatVariant::Persona, "k");
        assert_eq!(config.sampling.max_output_tokens, Some(1024));
        assert!(config.system_prompt.contains("Nancy"));
        assert!(config.variant.tracks_delivery());
        assert_eq!(config.variant.typing_label(), "Nancy is typing...");
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ChatConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.variant, ChatVariant::Tutor);
        assert!(config.api_key.is_empty());
        assert_eq!(
            config.model_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("CHAT_VARIANT", "WhatsApp"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GEMINI_API_BASE_URL", "http://localhost:1234/"),
        ]));
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.variant, ChatVariant::Persona);
        assert_eq!(
            config.model_endpoint(),
            "http://localhost:1234/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_unknown_variant_falls_back_to_tutor() {
        let config = ChatConfig::from_lookup(lookup_from(&[("CHAT_VARIANT", "pirate")]));
        assert_eq!(config.variant, ChatVariant::Tutor);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ChatConfig::for_variant(ChatVariant::Tutor, "").validate(),
            Err(ChatError::EmptyApiKey)
        ));
        assert!(ChatConfig::for_variant(ChatVariant::Persona, "k")
            .validate()
            .is_ok());

        let mut config = ChatConfig::for_variant(ChatVariant::Tutor, "k");
        config.sampling.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = ChatConfig::for_variant(ChatVariant::Tutor, "k");
        config.sampling.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = ChatConfig::for_variant(ChatVariant::Tutor, "k");
        config.sampling.max_output_tokens = Some(0);
        assert!(config.validate().is_err());

        let mut config = ChatConfig::for_variant(ChatVariant::Tutor, "k");
        config.model.clear();
        assert!(config.validate().is_err());
    }
}
