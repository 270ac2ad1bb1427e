use std::sync::LazyLock;

use regex::Regex;

/// Ordered catalog of node-reference syntaxes seen in ticket descriptions.
/// First matching pattern wins. Patterns run against upper-cased text.
const NODE_PATTERNS: &[&str] = &[
    r"NODE\s*(\d+)",         // NODE1, NODE 1
    r"NODE\s*\((\d+)\)",     // NODE (1), NODE(2)
    r"NODE\s*#(\d+)",        // NODE#1, NODE #1
    r"\*\*NODE\s*(\d+)\*\*", // **NODE1**
    r"ESP\s+NODE\s*(\d+)",   // ESP NODE 1
    r"NODE\(\s*(\d+)\s*\)",  // NODE( 2 )
    r"NODES\s*(\d+)",        // NODES1, NODES 2
    r"NODE-(\d+)",           // NODE-1
    r"NODE_(\d+)",           // NODE_1
];

static NODE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NODE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("NODE_PATTERNS: invalid pattern"))
        .collect()
});

/// Extract the node number from a ticket description.
///
/// Only 1 and 2 are valid node numbers. A pattern match capturing any other
/// integer stops the scan and yields None: a wrong node number is worse than
/// no node number, since under-identification just routes the ticket to
/// manual review. Text mentioning nodes in the plural without a usable digit
/// is ambiguous and also yields None.
pub fn extract_node_number(description: &str) -> Option<u8> {
    let desc = description.to_uppercase();

    for re in NODE_REGEXES.iter() {
        if let Some(caps) = re.captures(&desc) {
            return match caps[1].parse::<u8>() {
                Ok(n @ (1 | 2)) => Some(n),
                // Captured an out-of-range number: ambiguous, stop scanning.
                _ => None,
            };
        }
    }

    if desc.contains("NODES") && desc.contains("NODE") {
        // Multiple nodes implied, cannot disambiguate.
        return None;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_forms() {
        assert_eq!(extract_node_number("NODE1 offline"), Some(1));
        assert_eq!(extract_node_number("node 2 down"), Some(2));
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(extract_node_number("store offline NODE (1)"), Some(1));
        assert_eq!(extract_node_number("NODE( 2 )"), Some(2));
    }

    #[test]
    fn test_hash_prefixed() {
        assert_eq!(extract_node_number("NODE#2 unreachable"), Some(2));
        assert_eq!(extract_node_number("NODE #1"), Some(1));
    }

    #[test]
    fn test_bold_emphasized() {
        assert_eq!(extract_node_number("**NODE2** needs replacement"), Some(2));
    }

    #[test]
    fn test_esp_node() {
        assert_eq!(extract_node_number("ESP NODE 1 offline"), Some(1));
    }

    #[test]
    fn test_dash_and_underscore() {
        assert_eq!(extract_node_number("replace NODE-1"), Some(1));
        assert_eq!(extract_node_number("NODE_2 offline"), Some(2));
    }

    #[test]
    fn test_plural_with_digit() {
        assert_eq!(extract_node_number("NODES 2 offline"), Some(2));
    }

    #[test]
    fn test_out_of_range_is_ambiguous() {
        assert_eq!(extract_node_number("NODE 3 offline"), None);
        assert_eq!(extract_node_number("NODE 0"), None);
        assert_eq!(extract_node_number("NODE 12"), None);
    }

    #[test]
    fn test_out_of_range_stops_scan() {
        // The first match (NODE 3) is invalid; later valid references must
        // not rescue the extraction.
        assert_eq!(extract_node_number("NODE 3 was replaced by NODE-1"), None);
    }

    #[test]
    fn test_plural_without_digit_is_ambiguous() {
        assert_eq!(extract_node_number("both NODES are offline"), None);
    }

    #[test]
    fn test_no_node_mention() {
        assert_eq!(extract_node_number("deposit discrepancy"), None);
        assert_eq!(extract_node_number(""), None);
    }

    #[test]
    fn test_never_returns_outside_one_two() {
        for text in &["NODE 1", "NODE 2", "NODE 3", "NODE 99", "NODES 4", "NODE-7"] {
            let n = extract_node_number(text);
            assert!(n.is_none() || n == Some(1) || n == Some(2));
        }
    }
}
