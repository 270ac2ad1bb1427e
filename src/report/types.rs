use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::parser::deserializers::parse_flexible_datetime;

/// One store/node pair currently reported down. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct OfflineNode {
    pub store_number: u32,
    pub node_number: u8,
    pub esp_id: String,
    /// Verbatim timestamp from the report; parsed on demand.
    pub last_seen: String,
}

impl OfflineNode {
    pub fn last_seen_at(&self) -> Option<NaiveDateTime> {
        parse_flexible_datetime(&self.last_seen)
    }

    /// Whole days since the node was last seen, or None when the report
    /// timestamp does not parse.
    pub fn days_offline(&self, now: NaiveDateTime) -> Option<i64> {
        self.last_seen_at().map(|seen| (now - seen).num_days())
    }

    pub fn is_long_term_offline(&self, now: NaiveDateTime, threshold_days: i64) -> bool {
        self.days_offline(now)
            .is_some_and(|days| days >= threshold_days)
    }
}

/// Index over the offline nodes report: which nodes are down per store, the
/// per-node detail records, and the two derived critical-store sets.
/// Built once per report load; read-only afterward.
#[derive(Debug, Default)]
pub struct OfflineIndex {
    stores: HashMap<u32, BTreeSet<u8>>,
    details: HashMap<(u32, u8), OfflineNode>,
    saf_stores: HashSet<u32>,
    both_down_stores: HashSet<u32>,
}

impl OfflineIndex {
    /// Coarse entry: node known down, no detail record (loose-pattern parse).
    pub fn add_node(&mut self, store: u32, node: u8) {
        self.stores.entry(store).or_default().insert(node);
    }

    /// Rich entry. Keeps the coarse map in sync so every detail key has a
    /// corresponding coarse entry.
    pub fn add_detail(&mut self, detail: OfflineNode) {
        self.add_node(detail.store_number, detail.node_number);
        self.details
            .insert((detail.store_number, detail.node_number), detail);
    }

    pub fn mark_saf(&mut self, store: u32) {
        self.saf_stores.insert(store);
    }

    pub fn mark_both_down(&mut self, store: u32) {
        self.both_down_stores.insert(store);
    }

    pub fn contains_store(&self, store: u32) -> bool {
        self.stores.contains_key(&store)
    }

    pub fn offline_nodes(&self, store: u32) -> Option<&BTreeSet<u8>> {
        self.stores.get(&store)
    }

    pub fn detail(&self, store: u32, node: u8) -> Option<&OfflineNode> {
        self.details.get(&(store, node))
    }

    /// All detail records for a store, in node order.
    pub fn details_for_store(&self, store: u32) -> Vec<&OfflineNode> {
        self.offline_nodes(store)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|&n| self.detail(store, n))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_saf(&self, store: u32) -> bool {
        self.saf_stores.contains(&store)
    }

    pub fn has_both_nodes_down(&self, store: u32) -> bool {
        self.both_down_stores.contains(&store)
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn node_count(&self) -> usize {
        self.stores.values().map(|nodes| nodes.len()).sum()
    }

    /// Store numbers in ascending order, for reproducible sweeps.
    pub fn store_numbers(&self) -> Vec<u32> {
        let mut stores: Vec<u32> = self.stores.keys().copied().collect();
        stores.sort_unstable();
        stores
    }
}
