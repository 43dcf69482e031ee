//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start the conversation over.
    Clear,

    /// Change the model.
    Model(String),

    /// Set or clear the system prompt.
    /// `None` clears the current system prompt.
    System(Option<String>),

    /// Set the maximum tokens per response.
    MaxTokens(u32),

    /// Set the sampling temperature.
    Temperature(f32),

    /// Clear the sampling temperature (use model default).
    ClearTemperature,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics (message count, current model, etc.).
    Stats,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use focusflow::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model gemini-2.5-pro").is_some());
/// assert!(parse_command("What is a binary tree?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "system" => ChatCommand::System(argument.map(|s| s.to_string())),
        "max-tokens" => match argument.map(|s| s.parse::<u32>()) {
            Some(Ok(value)) => ChatCommand::MaxTokens(value),
            Some(Err(_)) => {
                ChatCommand::Invalid("/max-tokens requires a positive integer".to_string())
            }
            None => ChatCommand::Invalid("/max-tokens requires a value".to_string()),
        },
        "temperature" => match argument.map(|s| s.parse::<f32>()) {
            Some(Ok(value)) => ChatCommand::Temperature(value),
            Some(Err(_)) => ChatCommand::Invalid("/temperature requires a number".to_string()),
            None => ChatCommand::ClearTemperature,
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" => ChatCommand::Stats,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns the help text describing available commands.
pub fn help_text() -> &'static str {
    "Available commands:
/clear              Start the conversation over
/model <name>       Change the model
/system [prompt]    Set the system prompt (no argument clears it)
/max-tokens <n>     Set the maximum tokens per response
/temperature [t]    Set the sampling temperature (no argument resets it)
/stats              Show session statistics
/help               Show this help
/quit               Exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_commands_pass_through() {
        assert!(parse_command("hello").is_none());
        assert!(parse_command("  what is 2/3?  ").is_none());
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
    }

    #[test]
    fn parse_model_command() {
        assert_eq!(
            parse_command("/model gemini-2.5-pro"),
            Some(ChatCommand::Model("gemini-2.5-pro".to_string()))
        );
        assert!(matches!(
            parse_command("/model"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn parse_system_command() {
        assert_eq!(
            parse_command("/system be brief"),
            Some(ChatCommand::System(Some("be brief".to_string())))
        );
        assert_eq!(parse_command("/system"), Some(ChatCommand::System(None)));
    }

    #[test]
    fn parse_max_tokens_command() {
        assert_eq!(
            parse_command("/max-tokens 2048"),
            Some(ChatCommand::MaxTokens(2048))
        );
        assert!(matches!(
            parse_command("/max-tokens lots"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn parse_temperature_command() {
        assert_eq!(
            parse_command("/temperature 0.7"),
            Some(ChatCommand::Temperature(0.7))
        );
        assert_eq!(
            parse_command("/temperature"),
            Some(ChatCommand::ClearTemperature)
        );
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(_))
        ));
    }
}
