// LLM abstraction layer

pub mod chat_api;
pub mod provider;

pub use provider::*;
