//! Helper for calling hosted foundation models.

mod client;
pub mod config;
mod params;
mod prompt;
mod provider;

pub use crate::error::InvokeError;
pub use client::{BedrockTransport, DEFAULT_MODEL_ID, ModelInvoker, ModelTransport};
pub use params::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, InferenceParams};
pub use prompt::{PromptTemplate, explain_prompt};
pub use provider::Provider;
