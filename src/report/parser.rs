use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::AppError;
use crate::report::types::{OfflineIndex, OfflineNode};

// ── Static regex ──────────────────────────────────────────────────────────────

/// Store section header, anchored at line start.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Store #(\d+)").expect("SECTION_RE: invalid pattern")
});

/// Rich node-down line: identifier, node digit, last-seen timestamp.
/// e.g. "esp5198-l01 is OFFLINE, last seen: 2025-09-01 12:00:00"
static NODE_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(esp\d+-l0([12]))\s+is\s+OFFLINE,\s+last\s+seen:\s*([^\r\n]+)")
        .expect("NODE_DETAIL_RE: invalid pattern")
});

/// Loose fallback: node digit only, no detail record.
static NODE_LOOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"esp\d+-l0([12])").expect("NODE_LOOSE_RE: invalid pattern"));

/// Literal marker for a store-and-forward failure, matched case-insensitively
/// anywhere in a store section.
const SAF_MARKER: &str = "STORE AND FORWARD FAILURE";

/// Parse the offline nodes report into an [`OfflineIndex`].
///
/// The report is a sequence of store sections, each headed by a
/// `Store #<number>` line. A report without a single recognizable section is
/// fatal; a section whose store number does not fit in u32 is logged and
/// skipped.
pub fn parse_offline_report(content: &str) -> Result<OfflineIndex, AppError> {
    let headers: Vec<(usize, usize, &str)> = SECTION_RE
        .captures_iter(content)
        .map(|caps| {
            let m = caps.get(0).expect("regex match has group 0");
            (m.start(), m.end(), caps.get(1).expect("capture 1").as_str())
        })
        .collect();

    if headers.is_empty() {
        return Err(AppError::NoStoreSections);
    }

    let mut index = OfflineIndex::default();

    for (i, &(_, section_start, store_str)) in headers.iter().enumerate() {
        let section_end = headers
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(content.len());
        let section = &content[section_start..section_end];

        let store_number = match store_str.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warn!("skipping section with malformed store number: {store_str:?}");
                continue;
            }
        };

        parse_section(&mut index, store_number, section);
    }

    info!(
        "offline report: {} nodes across {} stores",
        index.node_count(),
        index.store_count()
    );
    Ok(index)
}

fn parse_section(index: &mut OfflineIndex, store_number: u32, section: &str) {
    if section.to_uppercase().contains(SAF_MARKER) {
        index.mark_saf(store_number);
    }

    let mut found_detail = false;
    for caps in NODE_DETAIL_RE.captures_iter(section) {
        found_detail = true;
        let node_number: u8 = caps[2].parse().expect("node digit is 1 or 2");
        index.add_detail(OfflineNode {
            store_number,
            node_number,
            esp_id: caps[1].to_string(),
            last_seen: caps[3].trim().to_string(),
        });
    }

    // Looser sweep when the section carries no rich node lines.
    if !found_detail {
        for caps in NODE_LOOSE_RE.captures_iter(section) {
            let node_number: u8 = caps[1].parse().expect("node digit is 1 or 2");
            index.add_node(store_number, node_number);
        }
    }

    if index
        .offline_nodes(store_number)
        .is_some_and(|nodes| nodes.len() >= 2)
    {
        index.mark_both_down(store_number);
    }
}
