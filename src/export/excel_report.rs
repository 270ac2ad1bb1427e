use rust_xlsxwriter::{Workbook, XlsxError};

use crate::analyzer::missing::MissingTicketAdvisory;
use crate::analyzer::types::{AnalysisResult, TicketStatus};
use crate::error::AppError;
use crate::export::csv_report::{MISSING_COLUMNS, RESULT_COLUMNS};
use crate::export::{create_header_format, create_integer_format, create_wrap_format};

/// Render the full analysis as one workbook: one sheet per disposition plus
/// a missing-tickets sheet. Returns the XLSX bytes via `save_to_buffer()`.
pub fn generate_excel_report(
    results: &[AnalysisResult],
    advisories: &[MissingTicketAdvisory],
) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    for status in TicketStatus::ALL {
        let subset: Vec<&AnalysisResult> =
            results.iter().filter(|r| r.status == status).collect();
        write_disposition_sheet(&mut wb, status, &subset)?;
    }
    write_missing_sheet(&mut wb, advisories)?;
    Ok(wb.save_to_buffer()?)
}

fn write_disposition_sheet(
    wb: &mut Workbook,
    status: TicketStatus,
    results: &[&AnalysisResult],
) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name(status.label())?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let wrap = create_wrap_format();

    for (col, h) in RESULT_COLUMNS.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, r) in results.iter().enumerate() {
        let row = (i + 1) as u32;
        let t = &r.ticket;
        ws.write(row, 0, t.number.as_str())?;
        ws.write(row, 1, t.site.as_str())?;
        ws.write_with_format(row, 2, t.description.as_str(), &wrap)?;
        ws.write(row, 3, t.priority.as_str())?;
        ws.write(row, 4, t.created.as_str())?;
        ws.write(row, 5, t.updated.as_str())?;
        ws.write(row, 6, t.resolved.as_deref().unwrap_or(""))?;
        ws.write(row, 7, t.assignment_group.as_deref().unwrap_or(""))?;
        if let Some(store) = t.store_number {
            ws.write_with_format(row, 8, store as f64, &int)?;
        }
        if let Some(node) = t.node_number {
            ws.write_with_format(row, 9, node as f64, &int)?;
        }
        ws.write(row, 10, r.status.as_str())?;
        ws.write(row, 11, r.confidence.as_str())?;
        ws.write(row, 12, r.business_flag.map(|f| f.as_str()).unwrap_or(""))?;
        ws.write_with_format(row, 13, r.reason.as_str(), &wrap)?;
        ws.write_with_format(row, 14, r.temporal_analysis.as_str(), &wrap)?;
        if let Some(days) = r.days_offline {
            ws.write_with_format(row, 15, days as f64, &int)?;
        }
        ws.write(row, 16, if r.reopenable { "true" } else { "false" })?;
    }

    if !results.is_empty() {
        let last_row = results.len() as u32;
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, last_row, (RESULT_COLUMNS.len() - 1) as u16)?;
    }

    ws.set_column_width(0, 14)?;
    ws.set_column_width(1, 34)?;
    ws.set_column_width(2, 42)?;
    for col in 3u16..=9 {
        ws.set_column_width(col, 14)?;
    }
    ws.set_column_width(10, 14)?;
    ws.set_column_width(11, 11)?;
    ws.set_column_width(12, 18)?;
    ws.set_column_width(13, 46)?;
    ws.set_column_width(14, 46)?;
    ws.set_column_width(15, 12)?;
    ws.set_column_width(16, 11)?;

    Ok(())
}

fn write_missing_sheet(
    wb: &mut Workbook,
    advisories: &[MissingTicketAdvisory],
) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Missing Tickets")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let wrap = create_wrap_format();

    for (col, h) in MISSING_COLUMNS.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, a) in advisories.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_with_format(row, 0, a.store_number as f64, &int)?;
        ws.write_with_format(row, 1, a.node_number as f64, &int)?;
        ws.write(row, 2, a.priority)?;
        ws.write(row, 3, a.urgency)?;
        let offline = a
            .offline_nodes
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(";");
        ws.write(row, 4, offline)?;
        ws.write(row, 5, if a.saf_flagged { "true" } else { "false" })?;
        ws.write(row, 6, if a.both_nodes_offline { "true" } else { "false" })?;
        ws.write_with_format(row, 7, a.suggested_description.as_str(), &wrap)?;
        ws.write_with_format(row, 8, a.reason.as_str(), &wrap)?;
    }

    if !advisories.is_empty() {
        let last_row = advisories.len() as u32;
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, last_row, (MISSING_COLUMNS.len() - 1) as u16)?;
    }

    ws.set_column_width(0, 14)?;
    ws.set_column_width(1, 13)?;
    ws.set_column_width(2, 20)?;
    ws.set_column_width(3, 16)?;
    ws.set_column_width(4, 14)?;
    ws.set_column_width(5, 12)?;
    ws.set_column_width(6, 18)?;
    ws.set_column_width(7, 50)?;
    ws.set_column_width(8, 46)?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::Confidence;
    use crate::parser::types::Ticket;

    fn result(number: &str, status: TicketStatus) -> AnalysisResult {
        AnalysisResult {
            ticket: Ticket {
                site: "Wendy's #5198 - Deposit - 8993118".to_string(),
                number: number.to_string(),
                description: "ESP NODE 1 offline".to_string(),
                priority: "3 - Moderate".to_string(),
                created: "2025-09-05 08:00:00".to_string(),
                updated: "2025-09-06 08:00:00".to_string(),
                resolved: None,
                assignment_group: None,
                store_number: Some(5198),
                node_number: Some(1),
            },
            status,
            reason: "Node 1 is confirmed offline in the report".to_string(),
            store_in_report: true,
            node_in_report: true,
            confidence: Confidence::High,
            business_flag: None,
            temporal_analysis: String::new(),
            days_offline: Some(12),
            reopenable: false,
        }
    }

    fn advisory() -> MissingTicketAdvisory {
        MissingTicketAdvisory {
            store_number: 888,
            node_number: 2,
            priority: "CRITICAL-SAF",
            urgency: "Immediate",
            offline_nodes: vec![1, 2],
            saf_flagged: true,
            both_nodes_offline: true,
            suggested_description: "Store #888 ESP Node 2 reported offline - no matching ticket found"
                .to_string(),
            reason: "Store-and-forward failure active and no ticket references store 888"
                .to_string(),
        }
    }

    #[test]
    fn test_generate_excel_report_pk_signature() {
        let results = vec![
            result("INC001", TicketStatus::NeedsReview),
            result("INC002", TicketStatus::CanClose),
            result("INC003", TicketStatus::SuggestReopen),
        ];
        let bytes = generate_excel_report(&results, &[advisory()]).unwrap();
        assert!(bytes.len() > 4, "XLSX too small");
        // ZIP magic bytes PK (0x50 0x4B)
        assert_eq!(bytes[0], 0x50, "Expected PK signature byte 0");
        assert_eq!(bytes[1], 0x4B, "Expected PK signature byte 1");
    }

    #[test]
    fn test_generate_excel_report_empty_inputs() {
        // All seven sheets are still created, headers only.
        let bytes = generate_excel_report(&[], &[]).unwrap();
        assert_eq!(bytes[0], 0x50);
        assert_eq!(bytes[1], 0x4B);
    }

    #[test]
    fn test_result_with_absent_fields() {
        let mut r = result("INC004", TicketStatus::Error);
        r.ticket.store_number = None;
        r.ticket.node_number = None;
        r.days_offline = None;
        assert!(generate_excel_report(&[r], &[]).is_ok());
    }
}
