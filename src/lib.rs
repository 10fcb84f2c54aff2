//! ai-relay: thin HTTP relay for LLM backends.
//!
//! Forwards JSON requests to a cloud chat-completion API (Azure OpenAI) and a
//! locally hosted generation API (Ollama), returning the upstream status and
//! JSON body verbatim.

pub mod config;
pub mod error;
pub mod metrics;
pub mod relay;
pub mod server;
