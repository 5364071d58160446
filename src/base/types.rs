//! Common types used across the crate.

use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A support ticket awaiting triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Short headline entered by the reporter.
    pub title: String,
    /// Free-text body describing the problem.
    pub description: String,
}

/// Urgency assigned to a ticket by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

/// Structured triage verdict produced for a ticket.
///
/// Field names follow the JSON schema the model is instructed to emit, so this
/// deserializes directly from the model's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAnalysis {
    /// One or two sentence restatement of the issue.
    pub summary: String,
    /// Urgency estimate.
    pub priority: TicketPriority,
    /// Technical notes a human moderator can act on.
    pub helpful_notes: String,
    /// Skills relevant to resolving the ticket, e.g. `["React", "MongoDB"]`.
    pub related_skills: Vec<String>,
}
