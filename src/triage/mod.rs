//! The triage pipeline.
//!
//! This module contains the analysis machinery built on top of the provider
//! clients:
//! - The immutable provider registry and its selection weights.
//! - Weighted random provider selection.
//! - Extraction of the structured verdict from raw model output.
//! - The analyzer that ties selection, invocation, and fallback together.

pub mod analyzer;
pub mod extract;
pub mod registry;
pub mod selector;
