//! Utility binary for checking API access end to end through the session
//! controller. Not part of the desktop application.
//!
//! Usage: `chat_smoke [prompt...]` with `GEMINI_API_KEY` (and optionally
//! `CHAT_VARIANT`, `GEMINI_MODEL`, `GEMINI_API_BASE_URL`) set.

use gemini_chat_backend::chat::{DeliveryStatus, MessageRole};
use gemini_chat_backend::{ChatConfig, ChatSession, ChatVariant, GeminiClient, SubmitOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Testing a chat turn against the Generative Language API...\n");

    // Step 1: configuration
    println!("1. Loading configuration from environment...");
    let config = ChatConfig::from_env();
    if let Err(e) = config.validate() {
        eprintln!("   ✗ {}", e);
        eprintln!("   Make sure to export it: export GEMINI_API_KEY=\"your-key\"");
        return Err(e.into());
    }
    println!(
        "   ✓ Variant: {:?}, model: {}, key length: {} chars",
        config.variant,
        config.model,
        config.api_key.len()
    );

    // Step 2: one submission
    let prompt = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            match config.variant {
                ChatVariant::Tutor => "What is a binary search? Answer in one sentence.".to_string(),
                ChatVariant::Persona => "Hi! My name is Sam.".to_string(),
            }
        } else {
            args.join(" ")
        }
    };
    println!("\n2. Submitting: '{}'", prompt);

    let client = GeminiClient::new(reqwest::Client::new(), &config);
    let mut session = ChatSession::new(config);
    let outcome = session.submit(&client, &prompt).await;

    // Step 3: transcript
    println!("\n3. Transcript:");
    let view = session.render();
    for message in view.messages {
        let who = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant => view.title,
        };
        let tick = match message.delivery_status {
            Some(DeliveryStatus::Pending) => " ⏳",
            Some(DeliveryStatus::Delivered) => " ✓✓",
            Some(DeliveryStatus::Failed) => " ❗",
            None => "",
        };
        let stamp = message
            .timestamp
            .as_deref()
            .map(|t| format!("[{}] ", t))
            .unwrap_or_default();
        println!("   {}{}: {}{}", stamp, who, message.text, tick);
    }

    match outcome {
        SubmitOutcome::Replied => println!("\n✓ Reply received"),
        SubmitOutcome::SoftFailure => println!("\n⚠ API answered without text"),
        SubmitOutcome::Failed => {
            eprintln!("\n✗ {}", view.error_banner.unwrap_or("Request failed"));
            anyhow::bail!("chat turn failed");
        }
        SubmitOutcome::Rejected(reason) => anyhow::bail!("submission rejected: {:?}", reason),
    }

    Ok(())
}
