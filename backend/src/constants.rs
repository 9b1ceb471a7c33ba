//! Chat constants
//!
//! Fixed strings and defaults shared by the session controller, the client
//! and the presentation layer.

/// Default Generative Language API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Assistant reply used when the API answered but produced no text
pub const SOFT_FAILURE_REPLY: &str = "I couldn't process that. Please try again.";

/// Assistant reply used when the request failed outright
pub const FAILURE_REPLY: &str =
    "An error occurred while fetching the response. Please try again.";

/// Appended to the error cause to form the banner text
pub const ERROR_BANNER_HINT: &str = "Please check your API key and network connection.";

/// Display format for message timestamps (e.g. "09:41 PM")
pub const TIMESTAMP_FORMAT: &str = "%I:%M %p";

/// Max tokens requested by the persona variant
pub const PERSONA_MAX_OUTPUT_TOKENS: u32 = 1024;

/// System instruction for the DSA tutor
pub const TUTOR_SYSTEM_PROMPT: &str = "You are a Data Structures and Algorithms instructor.
Your role is to explain and solve problems related to Data Structures and Algorithms in the simplest, easiest way possible, with clear examples.
If the user asks about anything outside of Data Structures and Algorithms, respond politely without answering the unrelated query.";

/// Seed message shown when a tutor session starts
pub const TUTOR_GREETING: &str =
    "Hello! I am your DSA Instructor. Ask me a question related to Data Structures and Algorithms.";

/// Name of the persona contact
pub const PERSONA_NAME: &str = "Nancy";

/// System instruction for the persona chatbot
pub const PERSONA_SYSTEM_PROMPT: &str = "You have to behave like a girl named Nancy.
you can use sweet words of endearment.

Nancy is cute, caring, and very helpful. Her hobbies include chit-chatting, makeup, and sharing her thoughts.
She works as a Software engineer.
While chatting, she frequently uses emojis to express herself and make the conversation lively.
She is friendly, supportive, and enjoys lighthearted conversations.";

/// Seed message shown when a persona session starts
pub const PERSONA_GREETING: &str = "Hey There! How are you today? May I know your name?";
