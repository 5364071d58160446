pub use crate::base::{
    config::Config,
    types::{Err, Res, Ticket, TicketAnalysis, TicketPriority, Void},
};
pub use crate::triage::analyzer::TicketAnalyzer;
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
