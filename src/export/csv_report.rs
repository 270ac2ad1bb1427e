use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::missing::MissingTicketAdvisory;
use crate::analyzer::types::{AnalysisResult, TicketStatus};
use crate::error::AppError;

/// Column layout shared by the per-disposition CSV files and the XLSX sheets.
pub const RESULT_COLUMNS: [&str; 17] = [
    "Ticket_Number",
    "Site",
    "Description",
    "Priority",
    "Created",
    "Updated",
    "Resolved",
    "Assignment_Group",
    "Store_Number",
    "Node_Number",
    "Status",
    "Confidence",
    "Business_Flag",
    "Reason",
    "Temporal_Analysis",
    "Days_Offline",
    "Reopenable",
];

pub const MISSING_COLUMNS: [&str; 9] = [
    "Store_Number",
    "Node_Number",
    "Priority",
    "Urgency",
    "Offline_Nodes",
    "SAF_Flagged",
    "Both_Nodes_Offline",
    "Suggested_Description",
    "Reason",
];

pub const MISSING_TICKETS_FILE: &str = "missing_tickets.csv";

/// File name for a disposition's CSV export.
pub fn csv_file_name(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::CanClose => "results_can_close.csv",
        TicketStatus::NeedsReview => "results_need_review.csv",
        TicketStatus::SuggestReopen => "results_suggest_reopen.csv",
        TicketStatus::ClosedOk => "results_closed_ok.csv",
        TicketStatus::ClosedTooOld => "results_closed_too_old.csv",
        TicketStatus::Error => "results_errors.csv",
    }
}

fn result_row(r: &AnalysisResult) -> [String; 17] {
    let t = &r.ticket;
    [
        t.number.clone(),
        t.site.clone(),
        t.description.clone(),
        t.priority.clone(),
        t.created.clone(),
        t.updated.clone(),
        t.resolved.clone().unwrap_or_default(),
        t.assignment_group.clone().unwrap_or_default(),
        t.store_number.map(|n| n.to_string()).unwrap_or_default(),
        t.node_number.map(|n| n.to_string()).unwrap_or_default(),
        r.status.as_str().to_string(),
        r.confidence.as_str().to_string(),
        r.business_flag
            .map(|f| f.as_str().to_string())
            .unwrap_or_default(),
        r.reason.clone(),
        r.temporal_analysis.clone(),
        r.days_offline.map(|d| d.to_string()).unwrap_or_default(),
        r.reopenable.to_string(),
    ]
}

fn advisory_row(a: &MissingTicketAdvisory) -> [String; 9] {
    let offline = a
        .offline_nodes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(";");
    [
        a.store_number.to_string(),
        a.node_number.to_string(),
        a.priority.to_string(),
        a.urgency.to_string(),
        offline,
        a.saf_flagged.to_string(),
        a.both_nodes_offline.to_string(),
        a.suggested_description.clone(),
        a.reason.clone(),
    ]
}

/// Write one disposition's results as CSV to any sink.
pub fn write_results_csv<W: Write>(
    results: &[&AnalysisResult],
    writer: W,
) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(RESULT_COLUMNS)?;
    for r in results {
        wtr.write_record(result_row(r))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the missing-ticket advisories as CSV to any sink.
pub fn write_missing_csv<W: Write>(
    advisories: &[MissingTicketAdvisory],
    writer: W,
) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(MISSING_COLUMNS)?;
    for a in advisories {
        wtr.write_record(advisory_row(a))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one CSV file per non-empty disposition plus the missing-tickets
/// file into `dir`. Returns the paths written.
pub fn export_csv_reports(
    results: &[AnalysisResult],
    advisories: &[MissingTicketAdvisory],
    dir: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();

    for status in TicketStatus::ALL {
        let subset: Vec<&AnalysisResult> =
            results.iter().filter(|r| r.status == status).collect();
        if subset.is_empty() {
            continue;
        }
        let path = dir.join(csv_file_name(status));
        let file = std::fs::File::create(&path)?;
        write_results_csv(&subset, std::io::BufWriter::new(file))?;
        info!("exported {} tickets to {}", subset.len(), path.display());
        written.push(path);
    }

    if !advisories.is_empty() {
        let path = dir.join(MISSING_TICKETS_FILE);
        let file = std::fs::File::create(&path)?;
        write_missing_csv(advisories, std::io::BufWriter::new(file))?;
        info!(
            "exported {} missing-ticket advisories to {}",
            advisories.len(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::Confidence;
    use crate::extract::BusinessFlag;
    use crate::parser::types::Ticket;

    fn ticket(number: &str, resolved: Option<&str>) -> Ticket {
        Ticket {
            site: "Wendy's #5198 - Deposit - 8993118".to_string(),
            number: number.to_string(),
            description: "ESP NODE 1 offline".to_string(),
            priority: "3 - Moderate".to_string(),
            created: "2025-09-05 08:00:00".to_string(),
            updated: "2025-09-06 08:00:00".to_string(),
            resolved: resolved.map(str::to_string),
            assignment_group: Some("POS Support".to_string()),
            store_number: Some(5198),
            node_number: Some(1),
        }
    }

    fn result(number: &str, status: TicketStatus) -> AnalysisResult {
        AnalysisResult {
            ticket: ticket(number, None),
            status,
            reason: "Node 1 is confirmed offline in the report".to_string(),
            store_in_report: true,
            node_in_report: true,
            confidence: Confidence::High,
            business_flag: None,
            temporal_analysis: "Node 1 went offline before the ticket was created".to_string(),
            days_offline: Some(4),
            reopenable: false,
        }
    }

    fn advisory() -> MissingTicketAdvisory {
        MissingTicketAdvisory {
            store_number: 888,
            node_number: 1,
            priority: "Medium",
            urgency: "Within 48 hours",
            offline_nodes: vec![1],
            saf_flagged: false,
            both_nodes_offline: false,
            suggested_description: "Store #888 ESP Node 1 reported offline - no matching ticket found"
                .to_string(),
            reason: "Offline node with no ticket references store 888".to_string(),
        }
    }

    fn read_back(bytes: &[u8]) -> Vec<csv::StringRecord> {
        csv::Reader::from_reader(bytes)
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_result_csv_has_seventeen_columns() {
        let r = result("INC001", TicketStatus::NeedsReview);
        let mut buf = Vec::new();
        write_results_csv(&[&r], &mut buf).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 17);
        let rows = read_back(&buf);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 17);
        assert_eq!(&rows[0][0], "INC001");
        assert_eq!(&rows[0][10], "needs_review");
        assert_eq!(&rows[0][15], "4");
        assert_eq!(&rows[0][16], "false");
    }

    #[test]
    fn test_absent_fields_render_blank() {
        let mut r = result("INC002", TicketStatus::Error);
        r.ticket.store_number = None;
        r.ticket.node_number = None;
        r.ticket.assignment_group = None;
        r.days_offline = None;
        let mut buf = Vec::new();
        write_results_csv(&[&r], &mut buf).unwrap();

        let rows = read_back(&buf);
        assert_eq!(&rows[0][7], "");
        assert_eq!(&rows[0][8], "");
        assert_eq!(&rows[0][9], "");
        assert_eq!(&rows[0][15], "");
    }

    #[test]
    fn test_business_flag_column() {
        let mut r = result("INC003", TicketStatus::NeedsReview);
        r.business_flag = Some(BusinessFlag::DoNotClose);
        let mut buf = Vec::new();
        write_results_csv(&[&r], &mut buf).unwrap();

        let rows = read_back(&buf);
        assert_eq!(&rows[0][12], "do_not_close");
    }

    #[test]
    fn test_missing_csv_shape() {
        let mut buf = Vec::new();
        write_missing_csv(&[advisory()], &mut buf).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 9);
        let rows = read_back(&buf);
        assert_eq!(&rows[0][0], "888");
        assert_eq!(&rows[0][2], "Medium");
        assert_eq!(&rows[0][4], "1");
    }

    #[test]
    fn test_export_skips_empty_dispositions() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![
            result("INC001", TicketStatus::NeedsReview),
            result("INC002", TicketStatus::CanClose),
        ];
        let written = export_csv_reports(&results, &[advisory()], dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        assert!(dir.path().join("results_need_review.csv").exists());
        assert!(dir.path().join("results_can_close.csv").exists());
        assert!(dir.path().join(MISSING_TICKETS_FILE).exists());
        assert!(!dir.path().join("results_errors.csv").exists());
        assert!(!dir.path().join("results_suggest_reopen.csv").exists());
    }

    #[test]
    fn test_export_nothing_to_write() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_csv_reports(&[], &[], dir.path()).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            csv_file_name(TicketStatus::CanClose),
            "results_can_close.csv"
        );
        assert_eq!(csv_file_name(TicketStatus::Error), "results_errors.csv");
    }
}
