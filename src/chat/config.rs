//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

use crate::types::{GenerationConfig, KnownModel, Model};

/// System instruction applied to every conversation unless overridden.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and encouraging AI Study Tutor named 'FocusFlow'. \
Your goal is to help users understand concepts, solve problems, and stay motivated. \
Keep your answers clear, concise, and easy to understand. \
Use formatting like markdown for lists, code blocks, and emphasis to improve readability. \
Be supportive and patient.";

/// Command-line arguments for the focusflow-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "System prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: model default)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Optional system prompt to set conversation context.
    pub system_prompt: Option<String>,

    /// Maximum tokens per response. `None` uses the model default.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional top-p nucleus sampling value.
    pub top_p: Option<f32>,

    /// Optional top-k sampling limit.
    pub top_k: Option<u32>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - System prompt: the FocusFlow study-tutor persona
    /// - Color: enabled
    /// - Sampling: model defaults
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini25Flash),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_output_tokens: None,
            use_color: true,
            temperature: None,
            top_p: None,
            top_k: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    /// Clears the system prompt.
    pub fn without_system_prompt(mut self) -> Self {
        self.system_prompt = None;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the top-p value.
    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the top-k value.
    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    /// The generation config for requests, or `None` when every sampling
    /// field is unset.
    pub fn generation_config(&self) -> Option<GenerationConfig> {
        let config = GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        };
        if config.is_empty() { None } else { Some(config) }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(Model::from)
            .unwrap_or(Model::Known(KnownModel::Gemini25Flash));

        ChatConfig {
            model,
            system_prompt: args.system.or_else(|| Some(DEFAULT_SYSTEM_PROMPT.to_string())),
            max_output_tokens: args.max_output_tokens,
            use_color: !args.no_color,
            ..ChatConfig::new()
        }
    }
}
