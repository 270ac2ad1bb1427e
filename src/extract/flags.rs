use std::sync::LazyLock;

use regex::Regex;

/// Business-rule flag attached to an analysis result.
///
/// The first three variants are textual signals produced by
/// [`detect_business_flag`]; the two critical variants are only ever set by
/// the classifier from the offline report's store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessFlag {
    DoNotClose,
    WorkflowStatus,
    SpecialInstructions,
    CriticalSaf,
    CriticalBothNodesOffline,
}

impl BusinessFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessFlag::DoNotClose => "do_not_close",
            BusinessFlag::WorkflowStatus => "workflow_status",
            BusinessFlag::SpecialInstructions => "special_instructions",
            BusinessFlag::CriticalSaf => "critical_saf",
            BusinessFlag::CriticalBothNodesOffline => "critical_both_nodes_offline",
        }
    }

    /// Human-readable account used in result reasons.
    pub fn description(&self) -> &'static str {
        match self {
            BusinessFlag::DoNotClose => "Ticket contains 'do not close' instructions",
            BusinessFlag::WorkflowStatus => "Ticket has workflow status indicators",
            BusinessFlag::SpecialInstructions => {
                "Ticket contains special handling instructions"
            }
            BusinessFlag::CriticalSaf => "Store has an active store-and-forward failure",
            BusinessFlag::CriticalBothNodesOffline => "Both nodes are offline for this store",
        }
    }
}

impl std::fmt::Display for BusinessFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Pattern catalogs ──────────────────────────────────────────────────────────
// All patterns run against the upper-cased "site description" concatenation.

/// Explicit operator overrides. Must win over every other signal.
const DO_NOT_CLOSE_PATTERNS: &[&str] = &[
    r"DO\s*NOT\s*CLOSE",
    r"DON'?T\s*CLOSE",
    r"NOT\s*TO\s*CLOSE",
    r"KEEP\s*OPEN",
];

/// The ticket is mid-process with another team.
const WORKFLOW_PATTERNS: &[&str] = &[
    r"\*AEX\s+SUBMIT(?:TED)?\*",
    r"\*AWAITING\s+APPROVAL\*",
    r"\*TECH\s+SUBMIT(?:TED)?\*",
    r"\*APPROVED\*",
    r"\*AWAITING\s+INFO\*",
    r"\*AWAITING\s+ASSET\*",
    r"\*AWAITING\s+UPGRADE\*",
    r"\*EOL\*",
    r"\bWO\d+", // work order reference
    r"\bCS\d+", // case reference
];

/// Generic deferred-action phrasing.
const SPECIAL_INSTRUCTION_PATTERNS: &[&str] = &[
    r"ONCE\s+\w+\s+NODE\s+IS\s+INSTALLED",
    r"AFTER\s+\w+",
    r"PENDING\s+\w+",
    r"WAITING\s+FOR\s+\w+",
];

/// Categories in priority order: an explicit human override must never be
/// shadowed by a weaker heuristic match.
static FLAG_CATALOG: LazyLock<Vec<(BusinessFlag, Vec<Regex>)>> = LazyLock::new(|| {
    let compile = |patterns: &[&str]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("flag catalog: invalid pattern"))
            .collect()
    };
    vec![
        (BusinessFlag::DoNotClose, compile(DO_NOT_CLOSE_PATTERNS)),
        (BusinessFlag::WorkflowStatus, compile(WORKFLOW_PATTERNS)),
        (
            BusinessFlag::SpecialInstructions,
            compile(SPECIAL_INSTRUCTION_PATTERNS),
        ),
    ]
});

/// Classify ticket text into at most one business-rule flag.
/// The first category with any matching sub-pattern wins.
pub fn detect_business_flag(site: &str, description: &str) -> Option<BusinessFlag> {
    let combined = format!("{site} {description}").to_uppercase();

    for (flag, regexes) in FLAG_CATALOG.iter() {
        if regexes.iter().any(|re| re.is_match(&combined)) {
            return Some(*flag);
        }
    }
    None
}
