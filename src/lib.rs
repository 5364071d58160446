//! Library root for `ticket-triage`.
//!
//! Ticket-triage is an LLM-powered analyzer for technical support tickets designed to:
//! - Route each ticket to a model provider chosen by weighted random selection
//! - Ask the model for a structured triage verdict (summary, priority, notes, skills)
//! - Recover the JSON verdict from free-form model output, fenced or bare
//! - Fall back to the remaining providers when a call fails
//!
//! Provider adapters (Gemini, OpenAI, Anthropic) live behind a single generation
//! trait, so selection and fallback stay provider-agnostic. Ticket ingestion,
//! persistence, and notification belong to the surrounding service; this crate
//! is only the analysis step.

pub mod base;
pub mod prelude;
pub mod service;
pub mod triage;
