use crate::extract::BusinessFlag;
use crate::parser::types::Ticket;

/// Final disposition assigned to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    /// Node is back online (or never was offline); the ticket can be closed.
    CanClose,
    /// Something needs a human: node confirmed down, ambiguity, or a flag.
    NeedsReview,
    /// Ticket was closed while its outage is still active.
    SuggestReopen,
    /// Closed ticket whose closure the report confirms.
    ClosedOk,
    /// Closed too long ago to reopen automatically.
    ClosedTooOld,
    /// The ticket could not be tied to a store.
    Error,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::CanClose => "can_close",
            TicketStatus::NeedsReview => "needs_review",
            TicketStatus::SuggestReopen => "suggest_reopen",
            TicketStatus::ClosedOk => "closed_ok",
            TicketStatus::ClosedTooOld => "closed_too_old",
            TicketStatus::Error => "error",
        }
    }

    /// Sheet/file label, e.g. "Can Close".
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::CanClose => "Can Close",
            TicketStatus::NeedsReview => "Need Review",
            TicketStatus::SuggestReopen => "Suggest Reopen",
            TicketStatus::ClosedOk => "Closed OK",
            TicketStatus::ClosedTooOld => "Closed Too Old",
            TicketStatus::Error => "Errors",
        }
    }

    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::CanClose,
        TicketStatus::NeedsReview,
        TicketStatus::SuggestReopen,
        TicketStatus::ClosedOk,
        TicketStatus::ClosedTooOld,
        TicketStatus::Error,
    ];
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's output for one ticket. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub ticket: Ticket,
    pub status: TicketStatus,
    pub reason: String,
    pub store_in_report: bool,
    pub node_in_report: bool,
    pub confidence: Confidence,
    pub business_flag: Option<BusinessFlag>,
    pub temporal_analysis: String,
    pub days_offline: Option<i64>,
    pub reopenable: bool,
}
