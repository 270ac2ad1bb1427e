use std::sync::LazyLock;

use regex::Regex;

// ── Static regex ──────────────────────────────────────────────────────────────

/// Convention (a): brand token followed by `#<digits>`, apostrophe optional.
/// e.g. "Wendy's #5198 - Deposit - 8993118", "WENDYS #204"
static STORE_HASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)WENDY'?S\s*#(\d+)").expect("STORE_HASH_RE: invalid pattern")
});

/// Convention (b): brand token, whitespace, zero-padded numeric code with an
/// optional dash-delimited suffix. e.g. "Wendys 0005198-2"
static STORE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)WENDY'?S\s+(\d+)(?:-\d+)?").expect("STORE_CODE_RE: invalid pattern")
});

/// Extract the store number from a ticket's site field.
/// Conventions are tried in order; the first match wins. Leading zeros are
/// stripped by the integer parse (an all-zero code yields 0). Returns None
/// when neither convention matches.
pub fn extract_store_number(site: &str) -> Option<u32> {
    for re in [&*STORE_HASH_RE, &*STORE_CODE_RE] {
        if let Some(caps) = re.captures(site) {
            if let Ok(n) = caps[1].parse::<u32>() {
                return Some(n);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_convention() {
        assert_eq!(
            extract_store_number("Wendy's #5198 - Deposit - 8993118"),
            Some(5198)
        );
        assert_eq!(extract_store_number("Wendy's #204"), Some(204));
    }

    #[test]
    fn test_hash_convention_no_apostrophe() {
        assert_eq!(extract_store_number("Wendys #5198"), Some(5198));
    }

    #[test]
    fn test_hash_convention_case_insensitive() {
        assert_eq!(extract_store_number("WENDY'S #42 - ATM"), Some(42));
        assert_eq!(extract_store_number("wendy's #42"), Some(42));
    }

    #[test]
    fn test_code_convention_strips_leading_zeros() {
        assert_eq!(extract_store_number("Wendys 0005198"), Some(5198));
        assert_eq!(extract_store_number("Wendy's 00204 - Deposit"), Some(204));
    }

    #[test]
    fn test_code_convention_dash_suffix() {
        assert_eq!(extract_store_number("Wendys 0005198-2"), Some(5198));
    }

    #[test]
    fn test_code_all_zeros_yields_zero() {
        assert_eq!(extract_store_number("Wendys 0000"), Some(0));
    }

    #[test]
    fn test_hash_wins_over_code() {
        // Both conventions present: the hash form is tried first.
        assert_eq!(extract_store_number("Wendy's #11 Wendys 0022"), Some(11));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_store_number("Burger King #5198"), None);
        assert_eq!(extract_store_number("Deposit - 8993118"), None);
        assert_eq!(extract_store_number(""), None);
    }
}
