//! Text helpers shared by option matching and form parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?)(\d+)").unwrap());

/// Comparison key for catalog option names and values: trimmed, NFC-composed
/// and lowercased. `" Negro"` matches `"negro"`, and precomposed and
/// decomposed accents compare equal.
pub fn option_key(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().to_lowercase()
}

/// Parse the leading integer of a user-typed string.
///
/// Mirrors how browsers read numeric form fields: leading whitespace and a
/// sign are accepted, parsing stops at the first non-digit (`"70kg"` and
/// `"70.9"` both read as 70) and a string without leading digits is `None`.
/// Values beyond `i64` saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let caps = RE_LEADING_INT.captures(raw)?;
    let negative = caps.get(1).is_some_and(|sign| sign.as_str() == "-");
    let digits = caps.get(2)?.as_str();
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_key_trims_and_lowercases() {
        assert_eq!(option_key("  Verde Oliva "), "verde oliva");
        assert_eq!(option_key("TALLA"), "talla");
        assert_eq!(option_key(""), "");
    }

    #[test]
    fn option_key_composes_accents() {
        let decomposed = "Cafe\u{301}";
        let composed = "caf\u{e9}";
        assert_eq!(option_key(decomposed), composed);
    }

    #[test]
    fn leading_int_stops_at_first_non_digit() {
        assert_eq!(parse_leading_int("70"), Some(70));
        assert_eq!(parse_leading_int(" 70kg"), Some(70));
        assert_eq!(parse_leading_int("70.9"), Some(70));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("+88"), Some(88));
    }

    #[test]
    fn leading_int_rejects_non_numeric() {
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("   "), None);
        assert_eq!(parse_leading_int("kg70"), None);
    }

    #[test]
    fn leading_int_saturates_on_overflow() {
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }
}
