// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod markdown;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;
pub mod widgets;

// Re-exports
pub use client::Gemini;
pub use error::{Error, Result};
pub use types::*;
