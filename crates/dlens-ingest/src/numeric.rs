//! Lenient numeric parsing for display-formatted values.
//!
//! Financial exports routinely carry numbers dressed up for humans:
//! `"31.65M"` volumes, `"-0.78%"` daily changes, `"1,234.50"` prices.  This
//! module is the single place such strings become `f64`s, so the profiler
//! and any downstream consumer see the same magnitudes.

/// Magnitude multipliers for volume-style suffixes.
const SUFFIX_MULTIPLIERS: [(char, f64); 3] = [('K', 1e3), ('M', 1e6), ('B', 1e9)];

/// Parse a display-formatted number.
///
/// Handles, in combination: a trailing `K`/`M`/`B` magnitude suffix
/// (case-insensitive), a `%` sign, thousands-separator commas, and currency
/// or other decoration (every character other than digits, `-`, and `.` is
/// stripped).  Returns `None` when nothing numeric remains.
///
/// ```
/// use dlens_ingest::numeric::parse_loose;
///
/// assert_eq!(parse_loose("31.65M"), Some(31_650_000.0));
/// assert_eq!(parse_loose("-0.78%"), Some(-0.78));
/// assert_eq!(parse_loose("1,234.50"), Some(1234.5));
/// assert_eq!(parse_loose("n/a"), None);
/// ```
pub fn parse_loose(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let mut multiplier = 1.0;
    let mut body = s;
    if let Some(last) = s.chars().last() {
        let upper = last.to_ascii_uppercase();
        if let Some((_, m)) = SUFFIX_MULTIPLIERS.iter().find(|(c, _)| *c == upper) {
            multiplier = *m;
            body = &s[..s.len() - last.len_utf8()];
        }
    }

    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(value * multiplier)
}
