// Public modules
pub mod content;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod model;
pub mod role;

// Re-exports
pub use content::{Content, Part};
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{Candidate, GenerateContentResponse};
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
pub use role::Role;
