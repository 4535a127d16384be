/// Format a percentage value with a fixed number of decimals and no sign.
///
/// Rounds the exact binary value; exact ties go to the even digit, so
/// `12.25` prints as `12.2`.
///
/// # Examples
///
/// ```
/// use grades_core::formatting::format_percent;
///
/// assert_eq!(format_percent(25.0, 1), "25.0");
/// assert_eq!(format_percent(100.0 / 3.0, 1), "33.3");
/// assert_eq!(format_percent(0.0, 1), "0.0");
/// ```
pub fn format_percent(value: f64, decimals: u32) -> String {
    format!("{:.prec$}", value.abs(), prec = decimals as usize)
}

/// Share of `part` in `whole` as a formatted percentage.
///
/// # Examples
///
/// ```
/// use grades_core::formatting::format_share;
///
/// assert_eq!(format_share(15, 20, 1), "75.0");
/// assert_eq!(format_share(3, 0, 1), "0.0");
/// ```
pub fn format_share(part: u64, whole: u64, decimals: u32) -> String {
    if whole == 0 {
        return format_percent(0.0, decimals);
    }
    format_percent(part as f64 / whole as f64 * 100.0, decimals)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent_exact_tie_rounds_to_even() {
        assert_eq!(format_percent(12.25, 1), "12.2");
        assert_eq!(format_percent(12.75, 1), "12.8");
        assert_eq!(format_percent(0.125, 2), "0.12");
    }

    #[test]
    fn test_format_percent_inexact_values_round_by_binary_value() {
        // These are stored just below the midpoint.
        assert_eq!(format_percent(0.15, 1), "0.1");
        assert_eq!(format_percent(0.35, 1), "0.3");
        assert_eq!(format_percent(12.35, 1), "12.3");
    }

    #[test]
    fn test_format_percent_hundred() {
        assert_eq!(format_percent(100.0, 1), "100.0");
    }

    #[test]
    fn test_format_share_thirds() {
        assert_eq!(format_share(1, 3, 1), "33.3");
        assert_eq!(format_share(2, 3, 1), "66.7");
    }
}
