pub mod backend;
pub mod client;
pub mod types;

pub use backend::{ApiError, ChatBackend};
pub use client::HttpBackend;
pub use types::{
    AskReply, AskRequest, GenerationParameters, HealthStatus, ModelDescriptor, ModelInfo,
    SwitchReply,
};
