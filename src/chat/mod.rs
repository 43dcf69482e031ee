//! Chat module for streaming conversations with the FocusFlow tutor.
//!
//! This module is the core of the crate: a thin session client over the
//! remote streaming call, and a transcript controller that drives one
//! round-trip at a time. It supports:
//!
//! - Streaming replies with fragment-by-fragment display
//! - Markdown re-rendering of the accumulated reply on every fragment
//! - A fixed fallback reply when no credential is available
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: conversation context ownership and API interaction
//! - [`reply`]: the fragment stream of one assistant reply
//! - [`transcript`]: the transcript and its round-trip state machine
//! - [`commands`]: slash command parsing and handling

mod commands;
mod config;
mod reply;
mod session;
mod transcript;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_SYSTEM_PROMPT};
pub use reply::ReplyStream;
pub use session::{ChatSession, ReplySource};
pub use transcript::{
    FAILURE_NOTE, GENERIC_ERROR, GREETING, MISSING_KEY_ERROR, MISSING_KEY_REPLY, Message,
    MessageRole, TranscriptController, TurnPhase,
};
