pub mod classifier;
pub mod missing;
pub mod temporal;
pub mod types;

use std::collections::HashSet;

use chrono::NaiveDateTime;

pub use classifier::{analyze_closed_ticket, analyze_ticket, determine_confidence};
pub use missing::{find_missing_tickets, MissingTicketAdvisory};
pub use temporal::{correlate, TemporalCorrelation};
pub use types::{AnalysisResult, Confidence, TicketStatus};

use crate::config::AnalysisConfig;
use crate::parser::types::Ticket;
use crate::report::types::OfflineIndex;

/// Classify every ticket. Output order matches input order; tickets are
/// independent of one another.
pub fn run_analysis(
    tickets: &[Ticket],
    index: &OfflineIndex,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> Vec<AnalysisResult> {
    tickets
        .iter()
        .map(|ticket| analyze_ticket(ticket, index, config, now))
        .collect()
}

/// Store numbers referenced by at least one ticket (tickets whose store
/// could not be extracted contribute nothing).
pub fn stores_with_tickets(tickets: &[Ticket]) -> HashSet<u32> {
    tickets.iter().filter_map(|t| t.store_number).collect()
}
