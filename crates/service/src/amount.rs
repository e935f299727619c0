//! Caller-side gate for amounts typed by a user.

/// Parse an amount typed by a user.
///
/// Returns `None` for anything that is not a whole number. Callers treat `None` as "do
/// nothing": an unparseable amount is ignored rather than reported.
pub fn parse_amount(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}
