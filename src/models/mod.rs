pub mod chat;
pub mod gemini;

pub use chat::{ChatRequest, ContentBlock, Message, NormalizedResponse};
pub use gemini::{single_turn_payload, GenerateContentResponse, ListModelsResponse, ModelInfo};
