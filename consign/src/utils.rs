use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown for absent values.
pub const EMPTY_CELL: &str = "-";

/// Format a money amount with two decimals and thousands separators.
///
/// `1234567.891` → `"1,234,567.89"`, `-5` → `"-5.00"`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac}")
}

/// Format an optional money amount, using [`EMPTY_CELL`] for `None`.
pub fn format_money_opt(amount: Option<Decimal>) -> String {
    amount.map(format_money).unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Format a fractional rate as a percentage: `0.125` → `"12.5%"`.
pub fn format_percent(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.1}%")
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional string, using [`EMPTY_CELL`] for `None` or blank.
pub fn format_opt(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

/// Truncate to at most `width` characters, ending in `…` when cut.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_money(dec!(999.5)), "999.50");
        assert_eq!(format_money(dec!(1000)), "1,000.00");
        assert_eq!(format_money(dec!(0)), "0.00");
    }

    #[test]
    fn money_keeps_sign() {
        assert_eq!(format_money(dec!(-5)), "-5.00");
        assert_eq!(format_money(dec!(-12345.678)), "-12,345.68");
        assert_eq!(format_money(dec!(-0.001)), "0.00");
    }

    #[test]
    fn money_opt_placeholder() {
        assert_eq!(format_money_opt(None), EMPTY_CELL);
        assert_eq!(format_money_opt(Some(dec!(2.5))), "2.50");
    }

    #[test]
    fn percent_one_decimal() {
        assert_eq!(format_percent(dec!(0.125)), "12.5%");
        assert_eq!(format_percent(dec!(0.2)), "20.0%");
    }

    #[test]
    fn timestamp_minutes() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 59).unwrap();
        assert_eq!(format_timestamp(&ts), "2026-03-07 09:05");
    }

    #[test]
    fn opt_blank_is_placeholder() {
        assert_eq!(format_opt(None), EMPTY_CELL);
        assert_eq!(format_opt(Some("  ")), EMPTY_CELL);
        assert_eq!(format_opt(Some("ref-1")), "ref-1");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("vintage lamp", 20), "vintage lamp");
        assert_eq!(truncate("vintage lamp", 8), "vintage…");
        assert_eq!(truncate("abc", 0), "");
    }
}
