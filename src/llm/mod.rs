//! LLM inference boundary.
//!
//! This module provides the client abstraction the pipeline talks to,
//! the Ollama backends, and the prompt templates.

pub mod client;
pub mod prompts;

pub use client::{build_client, InferenceClient};
