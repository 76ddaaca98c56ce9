// 🔢 Checksum Layer - ISO 7064 mod-97-10
// Letters become two digits (A=10 … Z=35), the IBAN is rearranged to
// BBAN + country code + check digits, and the result must be ≡ 1 (mod 97).
//
// NL58ABNA0000000001
//   → 10112310 0000000001 | 2321 | 58
//   → 101123100000000001232158 mod 97 = 1 ✓

use crate::normalize::normalize;
use crate::schema::{bban_of, checksum_of, country_code_of};

/// Digits folded per step. 96 * 10^7 + 9_999_999 still fits in a u32.
pub const CHUNK_WIDTH: usize = 7;

// ============================================================================
// NUMERIC REPRESENTATION
// ============================================================================

/// Digits map to themselves, `A..Z` to `10..35`. Anything else is skipped.
pub fn numeric_representation(s: &str) -> String {
    let mut numeric = String::with_capacity(s.len() * 2);

    for b in s.bytes() {
        match b {
            b'A'..=b'Z' => {
                let value = b - 55;
                numeric.push(char::from(b'0' + value / 10));
                numeric.push(char::from(b'0' + value % 10));
            }
            b'0'..=b'9' => numeric.push(char::from(b)),
            _ => {}
        }
    }

    numeric
}

/// Rearranged form: numeric BBAN, numeric country code, then the check
/// digits as they appear (not converted).
pub fn rearranged_digits(normalized: &str) -> String {
    let mut digits = numeric_representation(bban_of(normalized));
    digits.push_str(&numeric_representation(country_code_of(normalized)));
    digits.push_str(checksum_of(normalized));
    digits
}

// ============================================================================
// MOD 97
// ============================================================================

fn reduce(digits: &[u8]) -> u32 {
    digits.chunks(CHUNK_WIDTH).fold(0u32, |remainder, chunk| {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
        (remainder * 10u32.pow(chunk.len() as u32) + value) % 97
    })
}

/// Remainder of an arbitrarily long decimal string modulo 97
///
/// Returns `None` if `digits` holds anything but ASCII digits. The empty
/// string reduces to 0.
pub fn mod97(digits: &str) -> Option<u32> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(reduce(digits.as_bytes()))
}

// ============================================================================
// CHECKSUM VALIDATOR
// ============================================================================

/// True iff the rearranged numeric form of `normalized` is ≡ 1 (mod 97)
pub fn check_checksum(normalized: &str) -> bool {
    mod97(&rearranged_digits(normalized)) == Some(1)
}

/// The two check digits that make `country_code + digits + bban` valid
///
/// Both inputs are normalized first. `compute_check_digits("NL", "ABNA0000000001")`
/// is `"58"`.
pub fn compute_check_digits(country_code: &str, bban: &str) -> String {
    let mut digits = numeric_representation(&normalize(bban));
    digits.push_str(&numeric_representation(&normalize(country_code)));
    digits.push_str("00");

    format!("{:02}", 98 - reduce(digits.as_bytes()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_representation() {
        assert_eq!(numeric_representation("NL"), "2321");
        assert_eq!(numeric_representation("AZ"), "1035");
        assert_eq!(numeric_representation("ABNA0000000001"), "101123100000000001");
        assert_eq!(numeric_representation("0123456789"), "0123456789");
        assert_eq!(numeric_representation(""), "");
    }

    #[test]
    fn test_rearranged_digits_order() {
        assert_eq!(
            rearranged_digits("NL58ABNA0000000001"),
            "101123100000000001232158"
        );
        assert_eq!(rearranged_digits("AA00000000000000"), "000000000000101000");
    }

    #[test]
    fn test_mod97_exact_values() {
        assert_eq!(mod97("101123100000000001232158"), Some(1));
        assert_eq!(mod97("000000000000101000"), Some(23));
        assert_eq!(mod97("3214282912345698765432161182"), Some(1));
        assert_eq!(mod97("97"), Some(0));
        assert_eq!(mod97("98"), Some(1));
        assert_eq!(mod97(""), Some(0));
    }

    #[test]
    fn test_mod97_rejects_non_digits() {
        assert_eq!(mod97("12A4"), None);
        assert_eq!(mod97(" 1"), None);
    }

    #[test]
    fn test_mod97_matches_native_arithmetic() {
        let samples = [
            "1",
            "96",
            "1234567",
            "12345678",
            "99999999999999",
            "123456789012345678901234567890123456",
            "00000000000000000000000000000000000001",
        ];
        for sample in samples {
            let native = (sample.parse::<u128>().unwrap() % 97) as u32;
            assert_eq!(mod97(sample), Some(native), "{}", sample);
        }
    }

    #[test]
    fn test_check_checksum() {
        assert!(check_checksum("NL58ABNA0000000001"));
        assert!(check_checksum("GB82WEST12345698765432"));
        assert!(check_checksum("DE89370400440532013000"));
        assert!(!check_checksum("AA00000000000000"));
    }

    #[test]
    fn test_swapped_characters_fail() {
        assert_eq!(mod97(&rearranged_digits("NL58ABAN0000000001")), Some(38));
        assert!(!check_checksum("NL58ABAN0000000001"));
        assert_eq!(mod97(&rearranged_digits("NL58ABNA0000000010")), Some(50));
    }

    #[test]
    fn test_letter_in_check_digits_fails() {
        assert!(!check_checksum("NL5XABNA0000000001"));
    }

    #[test]
    fn test_compute_check_digits() {
        assert_eq!(compute_check_digits("NL", "ABNA0000000001"), "58");
        assert_eq!(compute_check_digits("AA", "000000000000"), "75");
        assert_eq!(compute_check_digits("gb", "west 1234 5698 7654 32"), "82");
        assert!(check_checksum("AA75000000000000"));
    }
}
