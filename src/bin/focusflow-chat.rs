//! Interactive terminal front-end for the FocusFlow study assistant.
//!
//! This binary provides a streaming REPL for chatting with the tutor. If no
//! API key is available at startup the REPL still runs; the tutor answers
//! every message with a fixed fallback instead of calling the service.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! focusflow-chat
//!
//! # Specify a model
//! focusflow-chat --model gemini-2.5-pro
//!
//! # Override the tutor persona
//! focusflow-chat --system "You are a terse study partner"
//!
//! # Disable colors (useful for piping output)
//! focusflow-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Start the conversation over
//! - `/model <name>` - Change the model
//! - `/system [prompt]` - Set or clear the system prompt
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use focusflow::Gemini;
use focusflow::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer,
    TranscriptController, help_text, parse_command,
};
use focusflow::types::Model;

/// Main entry point for the focusflow-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("focusflow-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    // The credential is resolved exactly once. A missing key is not an
    // error here: the controller falls back to a fixed reply.
    let session = match Gemini::new(None) {
        Ok(client) => Some(ChatSession::new(client, config)),
        Err(_) => None,
    };

    let mut controller = TranscriptController::new(session);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("FocusFlow Study Space");
    if !controller.can_respond() {
        println!("(GEMINI_API_KEY not set; the tutor cannot respond)");
    }
    println!("Type /help for commands, /quit to exit\n");
    println!("Tutor: {}\n", controller.messages()[0].text);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            controller.reset();
                            if let Some(session) = controller.source_mut() {
                                session.clear();
                            }
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => match controller.source_mut() {
                            Some(session) => {
                                session.set_model(Model::from(model_name.as_str()));
                                renderer.print_info(&format!("Model changed to: {}", model_name));
                            }
                            None => renderer.print_error("No API key; nothing to configure."),
                        },
                        ChatCommand::System(prompt) => match controller.source_mut() {
                            Some(session) => {
                                session.set_system_prompt(prompt.clone());
                                match prompt {
                                    Some(p) => renderer
                                        .print_info(&format!("System prompt set to: {}", p)),
                                    None => renderer.print_info("System prompt cleared."),
                                }
                            }
                            None => renderer.print_error("No API key; nothing to configure."),
                        },
                        ChatCommand::MaxTokens(value) => match controller.source_mut() {
                            Some(session) => {
                                session.set_max_output_tokens(Some(value));
                                renderer.print_info(&format!("max_output_tokens set to {value}"));
                            }
                            None => renderer.print_error("No API key; nothing to configure."),
                        },
                        ChatCommand::Temperature(value) => match controller.source_mut() {
                            Some(session) => {
                                session.set_temperature(Some(value));
                                renderer.print_info(&format!("temperature set to {:.2}", value));
                            }
                            None => renderer.print_error("No API key; nothing to configure."),
                        },
                        ChatCommand::ClearTemperature => match controller.source_mut() {
                            Some(session) => {
                                session.set_temperature(None);
                                renderer.print_info("temperature reset to model default");
                            }
                            None => renderer.print_error("No API key; nothing to configure."),
                        },
                        ChatCommand::Stats => {
                            print_stats(&controller);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - stream the tutor's reply
                println!("Tutor:");
                controller.submit(line, &mut renderer).await;
                if let Some(error) = controller.last_error() {
                    renderer.print_error(error);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(controller: &TranscriptController) {
    println!("    Session Statistics:");
    println!("      Messages: {}", controller.messages().len());
    match controller.source() {
        Some(session) => {
            println!("      Model: {}", session.model());
            if let Some(prompt) = session.system_prompt() {
                println!("      System prompt: {}", prompt);
            } else {
                println!("      System prompt: (none)");
            }
            println!("      Context turns: {}", session.turn_count());
        }
        None => {
            println!("      Model: (no API key)");
        }
    }
    match controller.last_error() {
        Some(error) => println!("      Last error: {}", error),
        None => println!("      Last error: (none)"),
    }
}
