//! Core components, types, and utilities for the ticket analyzer.
//!
//! This module contains fundamental building blocks used throughout the crate:
//! - Configuration handling and environment variables.
//! - System directives and prompt construction for model calls.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
