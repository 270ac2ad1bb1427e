use std::io::Read;

use crate::error::AppError;
use crate::extract::{extract_node_number, extract_store_number};
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::deserializers::non_blank;
use crate::parser::types::{ParseOutput, ParseWarning, Ticket, TicketRaw};

/// Parse a ticket CSV file from `path`.
/// `progress_cb(rows_processed, tickets_accepted)` is called every 500 rows.
pub fn parse_tickets_csv(
    path: impl AsRef<std::path::Path>,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path)?;
    parse_tickets_reader(std::io::BufReader::new(file), progress_cb)
}

/// Core parsing logic — accepts any `Read` source, useful for tests.
pub fn parse_tickets_reader<R: Read>(
    reader: R,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    // Phase 2: parse and normalize records
    let mut tickets: Vec<Ticket> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        if row_idx % 500 == 0 {
            progress_cb(row_idx, tickets.len());
        }

        match result {
            Ok(record) => {
                let raw = record_to_raw(&col_map, &record);
                match normalize_ticket(&raw) {
                    Ok(ticket) => tickets.push(ticket),
                    Err(msg) => {
                        warnings.push(ParseWarning {
                            line: row_idx + 1, // +1 for the header row
                            message: msg,
                        });
                        skipped += 1;
                    }
                }
            }
            Err(err) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(ParseOutput {
        tickets,
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
    })
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> TicketRaw {
    TicketRaw {
        site: col_map.get(record, "Site").map(str::to_string),
        number: col_map.get(record, "Number").map(str::to_string),
        description: col_map
            .get(record, "Short description")
            .map(str::to_string),
        priority: col_map.get(record, "Priority").map(str::to_string),
        created: col_map.get(record, "Created").map(str::to_string),
        updated: col_map.get(record, "Updated").map(str::to_string),
        resolved: col_map.get(record, "Resolved").map(str::to_string),
        assignment_group: col_map
            .get(record, "Assignment group")
            .map(str::to_string),
    }
}

/// Two-phase construction: validate the required fields of the raw row, then
/// run the extraction pass exactly once. The resulting `Ticket` is immutable.
fn normalize_ticket(raw: &TicketRaw) -> Result<Ticket, String> {
    let required = |value: &Option<String>, name: &str| -> Result<String, String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("{name} is missing or blank"))
    };

    let site = required(&raw.site, "Site")?;
    let number = required(&raw.number, "Number")?;
    let description = required(&raw.description, "Short description")?;
    let priority = required(&raw.priority, "Priority")?;
    let created = required(&raw.created, "Created")?;
    let updated = required(&raw.updated, "Updated")?;

    let resolved = raw.resolved.as_deref().and_then(non_blank);
    let assignment_group = raw.assignment_group.as_deref().and_then(non_blank);

    // One-time extraction pass; cached on the ticket from here on.
    let store_number = extract_store_number(&site);
    let node_number = extract_node_number(&description);

    Ok(Ticket {
        site,
        number,
        description,
        priority,
        created,
        updated,
        resolved,
        assignment_group,
        store_number,
        node_number,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
