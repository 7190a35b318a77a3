pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod service;
pub mod tasks;

pub use config::ServiceConfig;
pub use error::{ApiError, DocumentError};
pub use llm::{GenerationParams, GroqGateway, LlmError, LlmGateway};
pub use models::*;
pub use service::{AppState, build_router, create_app};
