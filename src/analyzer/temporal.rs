use chrono::NaiveDateTime;

use crate::config::AnalysisConfig;
use crate::parser::types::Ticket;
use crate::report::types::{OfflineIndex, OfflineNode};

/// Correlation between a ticket's lifecycle and its store's downtime.
#[derive(Debug, Clone, Default)]
pub struct TemporalCorrelation {
    /// Human-readable account; empty when the store has no offline nodes.
    pub narrative: String,
    pub days_offline: Option<i64>,
    /// The node's last-seen timestamp post-dates the ticket's resolution:
    /// the ticket was closed before the report confirmed the outage.
    pub timeline_anomaly: bool,
}

/// "N days" plus a long-term marker once the outage crosses the threshold.
fn duration_label(detail: &OfflineNode, days: i64, config: &AnalysisConfig, now: NaiveDateTime) -> String {
    if detail.is_long_term_offline(now, config.long_term_offline_days) {
        format!("{days} days, long-term outage")
    } else {
        format!("{days} days")
    }
}

/// Correlate a ticket with the offline report.
///
/// With a disambiguated node and a matching detail record, the account is
/// exact; otherwise, if the store has offline nodes at all, the node with the
/// longest downtime stands in (best-effort, flagged as such in the wording).
pub fn correlate(
    ticket: &Ticket,
    index: &OfflineIndex,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> TemporalCorrelation {
    let Some(store) = ticket.store_number else {
        return TemporalCorrelation::default();
    };

    if let Some(node_number) = ticket.node_number {
        if let Some(detail) = index.detail(store, node_number) {
            return correlate_exact(ticket, detail, config, now);
        }
    }

    // Node unresolved (or no detail record): fall back to the store's
    // longest-running outage.
    let details = index.details_for_store(store);
    let longest = details
        .iter()
        .max_by_key(|d| d.days_offline(now).unwrap_or(-1));
    if let Some(detail) = longest {
        let days = detail.days_offline(now);
        let narrative = match days {
            Some(d) => format!(
                "Ticket does not pin down a node; longest outage in store is node {} ({}, last seen {})",
                detail.node_number,
                duration_label(detail, d, config, now),
                detail.last_seen
            ),
            None => format!(
                "Ticket does not pin down a node; node {} is offline with an unparseable last-seen timestamp",
                detail.node_number
            ),
        };
        return TemporalCorrelation {
            narrative,
            days_offline: days,
            timeline_anomaly: false,
        };
    }

    TemporalCorrelation::default()
}

fn correlate_exact(
    ticket: &Ticket,
    detail: &OfflineNode,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> TemporalCorrelation {
    let days = detail.days_offline(now);
    let last_seen_at = detail.last_seen_at();

    // Closed ticket whose outage post-dates the resolution: the closure was
    // premature no matter what the disposition rules say.
    if ticket.is_closed() {
        if let (Some(seen), Some(resolved)) = (last_seen_at, ticket.resolved_at()) {
            if seen > resolved {
                return TemporalCorrelation {
                    narrative: format!(
                        "Timeline anomaly: node {} was last seen {} - after the ticket was resolved {}",
                        detail.node_number, detail.last_seen, resolved.format("%Y-%m-%d %H:%M")
                    ),
                    days_offline: days,
                    timeline_anomaly: true,
                };
            }
        }
    }

    let narrative = match (days, last_seen_at, ticket.created_at()) {
        (Some(d), Some(seen), Some(created)) if seen < created => format!(
            "Node {} went offline before the ticket was created ({} offline, last seen {})",
            detail.node_number,
            duration_label(detail, d, config, now),
            detail.last_seen
        ),
        (Some(d), _, _) => format!(
            "Node {} offline around ticket creation ({} offline, last seen {})",
            detail.node_number,
            duration_label(detail, d, config, now),
            detail.last_seen
        ),
        (None, _, _) => format!(
            "Node {} is offline; downtime unknown (unparseable last-seen timestamp {:?})",
            detail.node_number, detail.last_seen
        ),
    };

    TemporalCorrelation {
        narrative,
        days_offline: days,
        timeline_anomaly: false,
    }
}
