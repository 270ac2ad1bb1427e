use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::analyzer::missing::MissingTicketAdvisory;
use crate::analyzer::types::{AnalysisResult, Confidence, TicketStatus};
use crate::export::csv_report::{csv_file_name, MISSING_TICKETS_FILE};
use crate::extract::BusinessFlag;

const FLAG_ORDER: [BusinessFlag; 5] = [
    BusinessFlag::DoNotClose,
    BusinessFlag::WorkflowStatus,
    BusinessFlag::SpecialInstructions,
    BusinessFlag::CriticalSaf,
    BusinessFlag::CriticalBothNodesOffline,
];

const PRIORITY_ORDER: [&str; 4] = ["CRITICAL-SAF", "CRITICAL-BothNodes", "High", "Medium"];

fn file_note(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::CanClose => "Tickets that can be definitively closed",
        TicketStatus::NeedsReview => "Tickets requiring manual review",
        TicketStatus::SuggestReopen => "Closed tickets whose outage is still active",
        TicketStatus::ClosedOk => "Closed tickets whose closure the report confirms",
        TicketStatus::ClosedTooOld => "Closed tickets outside the reopen window",
        TicketStatus::Error => "Tickets with parsing errors",
    }
}

/// Render the plain-text run summary. Pure function of the engine output;
/// `generated_at` is passed in so the text stays reproducible.
pub fn render_summary(
    results: &[AnalysisResult],
    advisories: &[MissingTicketAdvisory],
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();
    let total = results.len();
    let count = |status: TicketStatus| results.iter().filter(|r| r.status == status).count();
    let pct = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };

    out.push_str("NODE CROSS-REFERENCE ANALYSIS SUMMARY\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Analysis performed on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("OVERALL STATISTICS:\n");
    out.push_str(&format!("Total tickets analyzed: {total}\n"));
    for (label, status) in [
        ("Can close", TicketStatus::CanClose),
        ("Need review", TicketStatus::NeedsReview),
        ("Suggest reopen", TicketStatus::SuggestReopen),
        ("Closed OK", TicketStatus::ClosedOk),
        ("Closed too old", TicketStatus::ClosedTooOld),
        ("Errors", TicketStatus::Error),
    ] {
        let n = count(status);
        out.push_str(&format!("{label}: {n} ({:.1}%)\n", pct(n)));
    }
    out.push('\n');

    out.push_str("CONFIDENCE BREAKDOWN:\n");
    for (label, confidence) in [
        ("High confidence", Confidence::High),
        ("Medium confidence", Confidence::Medium),
        ("Low confidence", Confidence::Low),
    ] {
        let n = results.iter().filter(|r| r.confidence == confidence).count();
        out.push_str(&format!("{label}: {n} ({:.1}%)\n", pct(n)));
    }
    out.push('\n');

    out.push_str("BUSINESS LOGIC FLAGS:\n");
    let flagged = results.iter().filter(|r| r.business_flag.is_some()).count();
    out.push_str(&format!(
        "Tickets with business logic flags: {flagged} ({:.1}%)\n",
        pct(flagged)
    ));
    for flag in FLAG_ORDER {
        let n = results
            .iter()
            .filter(|r| r.business_flag == Some(flag))
            .count();
        if n > 0 {
            out.push_str(&format!("  {flag}: {n} tickets\n"));
        }
    }
    out.push('\n');

    // First sentence of each reason, so variants of the same rule collapse.
    out.push_str("BREAKDOWN BY REASON:\n");
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in results {
        let first_sentence = r.reason.split('.').next().unwrap_or(&r.reason);
        let key = format!("{}: {first_sentence}", r.status);
        *reason_counts.entry(key).or_default() += 1;
    }
    let mut reasons: Vec<(&String, &usize)> = reason_counts.iter().collect();
    reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (reason, n) in reasons {
        out.push_str(&format!("  {reason}: {n} tickets\n"));
    }
    out.push('\n');

    out.push_str("STORE ANALYSIS:\n");
    let mut stores_with_tickets = std::collections::HashSet::new();
    let mut stores_in_report = std::collections::HashSet::new();
    for r in results {
        if let Some(store) = r.ticket.store_number {
            stores_with_tickets.insert(store);
            if r.store_in_report {
                stores_in_report.insert(store);
            }
        }
    }
    out.push_str(&format!(
        "Unique stores with tickets: {}\n",
        stores_with_tickets.len()
    ));
    out.push_str(&format!(
        "Stores with tickets that are in offline report: {}\n",
        stores_in_report.len()
    ));
    out.push_str(&format!(
        "Stores with tickets that are NOT in offline report: {}\n\n",
        stores_with_tickets.difference(&stores_in_report).count()
    ));

    out.push_str("MISSING TICKETS:\n");
    out.push_str(&format!(
        "Offline store/node pairs with no ticket: {}\n",
        advisories.len()
    ));
    for priority in PRIORITY_ORDER {
        let n = advisories.iter().filter(|a| a.priority == priority).count();
        if n > 0 {
            out.push_str(&format!("  {priority}: {n}\n"));
        }
    }
    out.push('\n');

    out.push_str("OUTPUT FILES GENERATED:\n");
    for status in TicketStatus::ALL {
        if count(status) > 0 {
            out.push_str(&format!(
                "  - {}: {}\n",
                csv_file_name(status),
                file_note(status)
            ));
        }
    }
    if !advisories.is_empty() {
        out.push_str(&format!(
            "  - {MISSING_TICKETS_FILE}: Offline nodes with no ticket\n"
        ));
    }
    out.push_str("  - summary_report.txt: This summary report\n");

    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
