// 🧹 Normalizer - electronic form of an IBAN
// Strips everything outside [A-Za-z0-9] and upper-cases the rest
//
// "NL 58 abna 0000 0000 01" → "NL58ABNA0000000001"
// "{NL}[58](ABNA)<0000>"    → "NL58ABNA0000"

/// Normalize raw IBAN input to its electronic form.
///
/// Total: garbage input yields an empty string, never an error.
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// True when `s` is already in normalized form (only `[A-Z0-9]`)
pub fn is_normalized(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_separators() {
        assert_eq!(normalize("NL 58 ABNA 0000 0000 01"), "NL58ABNA0000000001");
        assert_eq!(normalize("NL-58-ABNA-0000-0000-01"), "NL58ABNA0000000001");
    }

    #[test]
    fn test_strips_brackets_and_quotes() {
        assert_eq!(
            normalize("{NL}[58](ABNA)<0000>\"0000\"`01`"),
            "NL58ABNA0000000001"
        );
        assert_eq!(
            normalize("!@NL#$58%^ABNA&*0000;|0000,.01/:"),
            "NL58ABNA0000000001"
        );
    }

    #[test]
    fn test_uppercases() {
        assert_eq!(normalize("nl58abna0000000001"), "NL58ABNA0000000001");
        assert_eq!(normalize("nl 58 abna"), normalize("NL58ABNA"));
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        // Only ASCII alphanumerics survive
        assert_eq!(normalize("NLß58é"), "NL58");
    }

    #[test]
    fn test_empty_and_symbolic_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  -- ()[] "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("  gb82 West 1234 5698 7654 32 ");
        assert_eq!(normalize(&once), once);
        assert!(is_normalized(&once));
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("NL58ABNA0000000001"));
        assert!(is_normalized(""));
        assert!(!is_normalized("nl58"));
        assert!(!is_normalized("NL 58"));
    }
}
