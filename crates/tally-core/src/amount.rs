//! Currency amount extraction and formatting.
//!
//! Payment events carry their amount in free text (`"Payment £1,250.00 rent"`).
//! [`extract_amount`] pulls the first currency-like token out of such text;
//! [`format_amount`] renders a total back to the canonical 2-decimal form used
//! in generated summary events.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::constants::CURRENCY_GLYPH;

/// First currency-like token: optional glyph, 3-digit groups with optional
/// thousands separators, optional 1–2 digit fraction.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"£?(?:\d{1,3}(?:,\d{3})*|\d+)(?:\.\d{1,2})?").expect("valid regex")
});

/// Extract the first currency amount from free-form text.
///
/// Returns `None` when the text contains no recognizable amount. Amounts
/// without a fraction parse as whole currency units; thousands separators and
/// the currency glyph are stripped before parsing. Only the first token in
/// the text is considered.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    let token = AMOUNT_PATTERN.find(text)?.as_str();
    let stripped = token.replace(CURRENCY_GLYPH, "").replace(',', "");
    // The pattern guarantees a parseable remainder; treat failure as no match.
    Decimal::from_str(&stripped).ok()
}

/// Format an amount with the currency glyph and exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{CURRENCY_GLYPH}{:.2}", amount.round_dp(2))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn extracts_glyph_and_separators() {
        assert_eq!(extract_amount("Payment £1,250.00"), Some(dec("1250.00")));
    }

    #[test]
    fn extracts_bare_integer_as_whole_units() {
        assert_eq!(extract_amount("Payment 99"), Some(dec("99")));
    }

    #[test]
    fn no_digits_yields_none() {
        assert_eq!(extract_amount("no digits here"), None);
        assert_eq!(extract_amount(""), None);
    }

    #[test]
    fn large_grouped_amounts_parse() {
        assert_eq!(extract_amount("£12,345,678"), Some(dec("12345678")));
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(
            extract_amount("Payment £10.50 then £99.99"),
            Some(dec("10.50"))
        );
    }

    #[test]
    fn single_fraction_digit_accepted() {
        assert_eq!(extract_amount("Payment £4.5"), Some(dec("4.5")));
    }

    #[test]
    fn glyph_without_digits_is_none() {
        assert_eq!(extract_amount("£ nothing"), None);
    }

    #[test]
    fn amount_embedded_in_sentence() {
        assert_eq!(
            extract_amount("Payment to landlord £850.00 (June)"),
            Some(dec("850.00"))
        );
    }

    #[test]
    fn format_pads_to_two_decimals() {
        assert_eq!(format_amount(dec("99")), "£99.00");
        assert_eq!(format_amount(dec("1250")), "£1250.00");
    }

    #[test]
    fn format_rounds_excess_precision() {
        assert_eq!(format_amount(dec("10.005")), "£10.00");
        assert_eq!(format_amount(dec("10.015")), "£10.02");
    }

    #[test]
    fn format_roundtrips_through_extract() {
        let amount = Decimal::from_f64(1234.56).unwrap();
        let formatted = format_amount(amount);
        // No thousands separators on output, so the whole token survives.
        assert_eq!(extract_amount(&formatted), Some(dec("1234.56")));
    }
}
