//! Tag and formatting conventions shared across the workspace.

/// Summary prefix that marks a user-authored payment event.
pub const PAYMENT_TAG: &str = "Payment";

/// Summary prefix that marks a system-generated period total.
pub const TOTAL_TAG: &str = "Total Remaining";

/// Calendar color id applied to generated totals (red in the default palette).
pub const TOTAL_COLOR_ID: &str = "11";

/// Currency glyph recognized on input and emitted on output.
pub const CURRENCY_GLYPH: &str = "£";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct_prefixes() {
        assert!(!TOTAL_TAG.starts_with(PAYMENT_TAG));
        assert!(!PAYMENT_TAG.starts_with(TOTAL_TAG));
    }

    #[test]
    fn color_id_is_numeric() {
        let _: u8 = TOTAL_COLOR_ID.parse().expect("color id must be numeric");
    }
}
