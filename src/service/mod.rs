//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the model providers used by the
//! analyzer:
//! - LLM services (Gemini, OpenAI, Anthropic)
//!
//! The service module defines both a generic trait and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod llm;
