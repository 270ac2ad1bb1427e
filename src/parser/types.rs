use chrono::NaiveDateTime;

use crate::parser::deserializers::parse_flexible_datetime;

/// One CSV row as read, before validation and extraction.
#[derive(Debug, Clone, Default)]
pub struct TicketRaw {
    pub site: Option<String>,
    pub number: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub resolved: Option<String>,
    pub assignment_group: Option<String>,
}

/// One reported incident, normalized. The `store_number` / `node_number`
/// fields are extracted once at load time and never change afterwards.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub site: String,
    pub number: String,
    pub description: String,
    pub priority: String,
    pub created: String,
    pub updated: String,
    pub resolved: Option<String>,
    pub assignment_group: Option<String>,
    pub store_number: Option<u32>,
    pub node_number: Option<u8>,
}

impl Ticket {
    /// A ticket is closed when its resolved timestamp is present and non-blank.
    pub fn is_closed(&self) -> bool {
        self.resolved
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    pub fn resolved_at(&self) -> Option<NaiveDateTime> {
        self.resolved.as_deref().and_then(parse_flexible_datetime)
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_flexible_datetime(&self.created)
    }

    /// Closed recently enough to reopen: the resolved timestamp parses and
    /// lies at most `max_days` days before `now`.
    pub fn is_reopenable(&self, now: NaiveDateTime, max_days: i64) -> bool {
        if !self.is_closed() {
            return false;
        }
        match self.resolved_at() {
            Some(resolved) => (now - resolved).num_days() <= max_days,
            None => false,
        }
    }
}

/// Per-row irregularity collected during ingestion. The row is skipped, the
/// load continues.
#[derive(Debug, Clone)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

/// Output of `parse_tickets_csv` — normalized tickets plus load metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub tickets: Vec<Ticket>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn base_ticket() -> Ticket {
        Ticket {
            site: "Wendy's #5198 - Deposit - 8993118".to_string(),
            number: "INC0012345".to_string(),
            description: "ESP NODE 1 offline".to_string(),
            priority: "3 - Moderate".to_string(),
            created: "2025-09-01 08:00:00".to_string(),
            updated: "2025-09-02 09:00:00".to_string(),
            resolved: None,
            assignment_group: None,
            store_number: Some(5198),
            node_number: Some(1),
        }
    }

    #[test]
    fn test_is_closed() {
        let mut t = base_ticket();
        assert!(!t.is_closed());

        t.resolved = Some("2025-09-03 10:00:00".to_string());
        assert!(t.is_closed());

        t.resolved = Some("   ".to_string());
        assert!(!t.is_closed());
    }

    #[test]
    fn test_is_reopenable_open_ticket() {
        let t = base_ticket();
        assert!(!t.is_reopenable(dt("2025-09-10 00:00:00"), 7));
    }

    #[test]
    fn test_is_reopenable_within_window() {
        let mut t = base_ticket();
        t.resolved = Some("2025-09-07 12:00:00".to_string());
        assert!(t.is_reopenable(dt("2025-09-10 00:00:00"), 7));
    }

    #[test]
    fn test_is_reopenable_exactly_at_boundary() {
        let mut t = base_ticket();
        t.resolved = Some("2025-09-03 00:00:00".to_string());
        // Exactly 7 days elapsed: still reopenable (<= max_days).
        assert!(t.is_reopenable(dt("2025-09-10 00:00:00"), 7));
    }

    #[test]
    fn test_is_reopenable_too_old() {
        let mut t = base_ticket();
        t.resolved = Some("2025-09-01 00:00:00".to_string());
        assert!(!t.is_reopenable(dt("2025-09-11 00:00:00"), 7));
    }

    #[test]
    fn test_is_reopenable_unparseable_resolved() {
        let mut t = base_ticket();
        t.resolved = Some("last tuesday".to_string());
        assert!(t.is_closed());
        assert!(!t.is_reopenable(dt("2025-09-10 00:00:00"), 7));
    }

    #[test]
    fn test_resolved_at_multi_format() {
        let mut t = base_ticket();
        t.resolved = Some("03-09-2025 10:00".to_string());
        assert!(t.resolved_at().is_some());
    }
}
