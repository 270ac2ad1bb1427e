use std::collections::HashSet;

use crate::report::types::OfflineIndex;

/// Advisory for an offline store/node pair with no ticket referencing the
/// store at all. Purely additive reporting; per-ticket classification never
/// depends on it.
#[derive(Debug, Clone)]
pub struct MissingTicketAdvisory {
    pub store_number: u32,
    pub node_number: u8,
    pub priority: &'static str,
    pub urgency: &'static str,
    /// Full offline-node set for the store.
    pub offline_nodes: Vec<u8>,
    pub saf_flagged: bool,
    pub both_nodes_offline: bool,
    pub suggested_description: String,
    pub reason: String,
}

/// Sweep the index for offline nodes nobody has ticketed. One advisory per
/// offline node, sorted by store then node for reproducible reports.
pub fn find_missing_tickets(
    index: &OfflineIndex,
    stores_with_tickets: &HashSet<u32>,
) -> Vec<MissingTicketAdvisory> {
    let mut advisories = Vec::new();

    for store in index.store_numbers() {
        if stores_with_tickets.contains(&store) {
            continue;
        }
        let Some(nodes) = index.offline_nodes(store) else {
            continue;
        };
        let offline: Vec<u8> = nodes.iter().copied().collect();
        let saf = index.is_saf(store);
        let both_down = index.has_both_nodes_down(store);

        // Escalation order: SAF, both nodes down, multiple nodes, single node.
        let (priority, urgency, reason) = if saf {
            (
                "CRITICAL-SAF",
                "Immediate",
                format!("Store-and-forward failure active and no ticket references store {store}"),
            )
        } else if both_down {
            (
                "CRITICAL-BothNodes",
                "Immediate",
                format!("Both nodes offline and no ticket references store {store}"),
            )
        } else if offline.len() > 1 {
            (
                "High",
                "Within 24 hours",
                format!("Multiple offline nodes and no ticket references store {store}"),
            )
        } else {
            (
                "Medium",
                "Within 48 hours",
                format!("Offline node with no ticket references store {store}"),
            )
        };

        for &node in &offline {
            advisories.push(MissingTicketAdvisory {
                store_number: store,
                node_number: node,
                priority,
                urgency,
                offline_nodes: offline.clone(),
                saf_flagged: saf,
                both_nodes_offline: both_down,
                suggested_description: format!(
                    "Store #{store} ESP Node {node} reported offline - no matching ticket found"
                ),
                reason: reason.clone(),
            });
        }
    }

    advisories
}
