use chrono::NaiveDateTime;

use crate::analyzer::temporal::{correlate, TemporalCorrelation};
use crate::analyzer::types::{AnalysisResult, Confidence, TicketStatus};
use crate::config::AnalysisConfig;
use crate::extract::{detect_business_flag, BusinessFlag};
use crate::parser::types::Ticket;
use crate::report::types::OfflineIndex;

/// Shared confidence policy. Rewards precision (a specific node identified)
/// and penalizes ambiguity, regardless of which rule produced the
/// disposition. Critical-store rules bypass this and set high directly.
pub fn determine_confidence(
    store_number: Option<u32>,
    node_number: Option<u8>,
    store_in_report: bool,
    business_flag: Option<BusinessFlag>,
) -> Confidence {
    if business_flag.is_some() {
        return Confidence::Low;
    }
    if store_number.is_none() {
        return Confidence::Low;
    }
    if node_number.is_none() && store_in_report {
        return Confidence::Low;
    }
    if !store_in_report {
        // Store absent from the report: very confident it is online.
        return Confidence::High;
    }
    if node_number.is_some() {
        // Specific node plus store status: high confidence either way.
        return Confidence::High;
    }
    Confidence::Medium
}

#[allow(clippy::too_many_arguments)]
fn build_result(
    ticket: &Ticket,
    status: TicketStatus,
    reason: String,
    store_in_report: bool,
    node_in_report: bool,
    confidence: Confidence,
    business_flag: Option<BusinessFlag>,
    temporal: &TemporalCorrelation,
    reopenable: bool,
) -> AnalysisResult {
    AnalysisResult {
        ticket: ticket.clone(),
        status,
        reason,
        store_in_report,
        node_in_report,
        confidence,
        business_flag,
        temporal_analysis: temporal.narrative.clone(),
        days_offline: temporal.days_offline,
        reopenable,
    }
}

fn offline_vec(index: &OfflineIndex, store: u32) -> Vec<u8> {
    index
        .offline_nodes(store)
        .map(|nodes| nodes.iter().copied().collect())
        .unwrap_or_default()
}

/// Canonical entry point: classify one ticket against the offline report.
///
/// Closed tickets hit the closure-age gate first; tickets closed within the
/// grace window are routed to [`analyze_closed_ticket`], so the open-ticket
/// cascade below only ever sees open tickets. A long-closed ticket is
/// `closed_too_old` even when its store is critical - the age gate fires
/// before any store/node rule.
pub fn analyze_ticket(
    ticket: &Ticket,
    index: &OfflineIndex,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> AnalysisResult {
    if ticket.is_closed() {
        if !ticket.is_reopenable(now, config.reopen_grace_days) {
            let flag = detect_business_flag(&ticket.site, &ticket.description);
            let temporal = correlate(ticket, index, config, now);
            let store_in = ticket
                .store_number
                .is_some_and(|s| index.contains_store(s));
            let node_in = match (ticket.store_number, ticket.node_number) {
                (Some(s), Some(n)) => {
                    index.offline_nodes(s).is_some_and(|set| set.contains(&n))
                }
                _ => false,
            };
            let confidence = if flag.is_some() {
                Confidence::Low
            } else {
                Confidence::High
            };
            return build_result(
                ticket,
                TicketStatus::ClosedTooOld,
                format!(
                    "Ticket was resolved more than {} days ago - too old to reopen automatically",
                    config.reopen_grace_days
                ),
                store_in,
                node_in,
                confidence,
                flag,
                &temporal,
                false,
            );
        }
        return analyze_closed_ticket(ticket, index, config, now);
    }

    let flag = detect_business_flag(&ticket.site, &ticket.description);
    let temporal = correlate(ticket, index, config, now);
    let reopenable = false; // open ticket

    // Rule: no store number, nothing to cross-reference.
    let Some(store) = ticket.store_number else {
        return build_result(
            ticket,
            TicketStatus::Error,
            "Could not extract store number from site field".to_string(),
            false,
            false,
            determine_confidence(None, ticket.node_number, false, flag),
            flag,
            &temporal,
            reopenable,
        );
    };
    let store_in = index.contains_store(store);

    // Critical network state outranks any text-based instruction.
    if index.is_saf(store) {
        return build_result(
            ticket,
            TicketStatus::NeedsReview,
            "Store has an active store-and-forward failure - payment processing at risk"
                .to_string(),
            true,
            false,
            Confidence::High,
            Some(BusinessFlag::CriticalSaf),
            &temporal,
            reopenable,
        );
    }
    if index.has_both_nodes_down(store) {
        return build_result(
            ticket,
            TicketStatus::NeedsReview,
            "Both nodes are offline for this store - complete connectivity loss".to_string(),
            true,
            ticket.node_number.is_some(),
            Confidence::High,
            Some(BusinessFlag::CriticalBothNodesOffline),
            &temporal,
            reopenable,
        );
    }

    let offline = offline_vec(index, store);
    let node_in = ticket
        .node_number
        .is_some_and(|n| offline.contains(&n));

    // Business flags force manual review, with one relief valve: a workflow
    // marker is moot once the underlying outage is gone.
    if let Some(f) = flag {
        let outage_gone =
            !store_in || ticket.node_number.is_some_and(|n| !offline.contains(&n));
        if f == BusinessFlag::WorkflowStatus && outage_gone {
            let detail = if store_in {
                "its node is back online"
            } else {
                "the store is no longer in the offline report"
            };
            return build_result(
                ticket,
                TicketStatus::CanClose,
                format!("Workflow marker present but {detail} - ticket can close"),
                store_in,
                false,
                determine_confidence(Some(store), ticket.node_number, store_in, flag),
                flag,
                &temporal,
                reopenable,
            );
        }

        let state = if !store_in {
            "store not in offline report".to_string()
        } else {
            match ticket.node_number {
                Some(n) => format!("node {n} offline: {node_in}"),
                None => format!("offline nodes: {offline:?}"),
            }
        };
        return build_result(
            ticket,
            TicketStatus::NeedsReview,
            format!("{} - requires manual review ({state})", f.description()),
            store_in,
            node_in,
            determine_confidence(Some(store), ticket.node_number, store_in, flag),
            flag,
            &temporal,
            reopenable,
        );
    }

    if !store_in {
        return build_result(
            ticket,
            TicketStatus::CanClose,
            "Store not in offline report - store is online".to_string(),
            false,
            false,
            determine_confidence(Some(store), ticket.node_number, false, None),
            None,
            &temporal,
            reopenable,
        );
    }

    let Some(node) = ticket.node_number else {
        return build_result(
            ticket,
            TicketStatus::NeedsReview,
            format!(
                "Store is offline but couldn't identify specific node from description. Offline nodes: {offline:?}"
            ),
            true,
            false,
            determine_confidence(Some(store), None, true, None),
            None,
            &temporal,
            reopenable,
        );
    };

    let confidence = determine_confidence(Some(store), Some(node), true, None);
    if node_in {
        build_result(
            ticket,
            TicketStatus::NeedsReview,
            format!("Node {node} is confirmed offline in the report"),
            true,
            true,
            confidence,
            None,
            &temporal,
            reopenable,
        )
    } else {
        build_result(
            ticket,
            TicketStatus::CanClose,
            format!("Node {node} is not in offline report. Offline nodes for store: {offline:?}"),
            true,
            false,
            confidence,
            None,
            &temporal,
            reopenable,
        )
    }
}

/// Classify a closed (and still reopenable) ticket: was the closure correct?
///
/// Textual business flags are carried on the result but do not gate closed
/// dispositions - the question here is purely whether the outage the ticket
/// was about still exists.
pub fn analyze_closed_ticket(
    ticket: &Ticket,
    index: &OfflineIndex,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> AnalysisResult {
    let flag = detect_business_flag(&ticket.site, &ticket.description);
    let temporal = correlate(ticket, index, config, now);
    let reopenable = ticket.is_reopenable(now, config.reopen_grace_days);

    let Some(store) = ticket.store_number else {
        return build_result(
            ticket,
            TicketStatus::Error,
            "Could not extract store number from site field".to_string(),
            false,
            false,
            determine_confidence(None, ticket.node_number, false, flag),
            flag,
            &temporal,
            reopenable,
        );
    };

    if !index.contains_store(store) {
        return build_result(
            ticket,
            TicketStatus::ClosedOk,
            "Store not in offline report - no active outage, closure stands".to_string(),
            false,
            false,
            determine_confidence(Some(store), ticket.node_number, false, flag),
            flag,
            &temporal,
            reopenable,
        );
    }

    if index.is_saf(store) {
        return build_result(
            ticket,
            TicketStatus::SuggestReopen,
            "Store has an active store-and-forward failure - reopen and escalate".to_string(),
            true,
            false,
            Confidence::High,
            Some(BusinessFlag::CriticalSaf),
            &temporal,
            reopenable,
        );
    }
    if index.has_both_nodes_down(store) {
        return build_result(
            ticket,
            TicketStatus::SuggestReopen,
            "Both nodes are offline for this store - reopen, complete connectivity loss"
                .to_string(),
            true,
            ticket.node_number.is_some(),
            Confidence::High,
            Some(BusinessFlag::CriticalBothNodesOffline),
            &temporal,
            reopenable,
        );
    }

    let offline = offline_vec(index, store);

    let Some(node) = ticket.node_number else {
        // The outage is certain even though the node is not; explicit medium
        // here, demoted to low when a textual flag is present.
        let confidence = if flag.is_some() {
            Confidence::Low
        } else {
            Confidence::Medium
        };
        return build_result(
            ticket,
            TicketStatus::SuggestReopen,
            format!(
                "Store still has offline nodes {offline:?} but the ticket does not identify a node - reopen for review"
            ),
            true,
            false,
            confidence,
            flag,
            &temporal,
            reopenable,
        );
    };

    let node_in = offline.contains(&node);
    let confidence = determine_confidence(Some(store), Some(node), true, flag);
    if node_in {
        build_result(
            ticket,
            TicketStatus::SuggestReopen,
            format!("Node {node} is still offline in the report - ticket appears closed prematurely"),
            true,
            true,
            confidence,
            flag,
            &temporal,
            reopenable,
        )
    } else {
        build_result(
            ticket,
            TicketStatus::ClosedOk,
            format!("Node {node} is not in the offline report - closure stands"),
            true,
            false,
            confidence,
            flag,
            &temporal,
            reopenable,
        )
    }
}
