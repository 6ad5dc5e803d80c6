use serde::{Deserialize, Serialize};

use crate::model::{AmountUnit, Sample};

/// A numeric field after parsing: a finite value, or unknown when the text
/// could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "value")]
pub enum Measure {
    Known(f64),
    Unknown,
}

impl Measure {
    /// Reads the leading decimal number of `raw`, so `"100 µL"` is 100.
    pub fn parse(raw: &str) -> Self {
        match parse_leading_float(raw) {
            Some(value) => Measure::Known(value),
            None => Measure::Unknown,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Measure::Known(value) => Some(*value),
            Measure::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Measure::Known(_))
    }

    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

/// Remaining quantity and alert state for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantityStatus {
    pub remaining: Measure,
    pub threshold: Measure,
    pub low_stock: bool,
}

/// `max(0, total - uses * per_use)`; unknown when the total cannot be read.
/// An unreadable per-use amount counts as zero.
pub fn compute_remaining(sample: &Sample) -> Measure {
    remaining_from_parts(
        &sample.total_amount,
        &sample.amount_per_use,
        sample.uses_consumed,
    )
}

/// Same computation on raw form values, for live previews before a sample
/// is saved
pub fn remaining_from_parts(total_amount: &str, amount_per_use: &str, uses_consumed: u32) -> Measure {
    let Measure::Known(total) = Measure::parse(total_amount) else {
        return Measure::Unknown;
    };
    let per_use = Measure::parse(amount_per_use).or_zero();
    let remaining = total - f64::from(uses_consumed) * per_use;
    Measure::Known(remaining.max(0.0))
}

/// Alerting is opt-in: without a readable threshold a sample is never low.
pub fn assess(sample: &Sample) -> QuantityStatus {
    let remaining = compute_remaining(sample);
    let threshold = Measure::parse(&sample.warn_threshold);
    let low_stock = match (remaining, threshold) {
        (Measure::Known(remaining), Measure::Known(threshold)) => remaining <= threshold,
        _ => false,
    };
    QuantityStatus {
        remaining,
        threshold,
        low_stock,
    }
}

/// `"4.00 µL"`, or `"-"` when the quantity is unknown
pub fn format_quantity(measure: Measure, unit: &AmountUnit) -> String {
    match measure {
        Measure::Known(value) => format!("{:.2} {}", value, unit.label())
            .trim_end()
            .to_string(),
        Measure::Unknown => "-".to_string(),
    }
}

/// Leading non-negative integer of `raw`; anything else, negatives included, is 0.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    digits[..end].parse::<u64>().map_or(u32::MAX, |n| n.min(u32::MAX as u64) as u32)
}

/// Longest prefix of `raw` (after leading whitespace) that reads as a
/// decimal number with optional sign, fraction and exponent.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(total: &str, per_use: &str, uses: u32) -> Sample {
        Sample {
            total_amount: total.to_string(),
            amount_per_use: per_use.to_string(),
            uses_consumed: uses,
            ..Sample::named("CD3")
        }
    }

    #[test]
    fn test_remaining_examples() {
        assert_eq!(compute_remaining(&sample("10", "2", 3)), Measure::Known(4.0));
        assert_eq!(compute_remaining(&sample("10", "2", 10)), Measure::Known(0.0));
    }

    #[test]
    fn test_unreadable_total_is_unknown() {
        assert_eq!(compute_remaining(&sample("", "2", 1)), Measure::Unknown);
        assert_eq!(compute_remaining(&sample("lots", "2", 1)), Measure::Unknown);
        assert_eq!(
            format_quantity(compute_remaining(&sample("?", "1", 0)), &AmountUnit::Microliter),
            "-"
        );
    }

    #[test]
    fn test_unreadable_per_use_consumes_nothing() {
        assert_eq!(compute_remaining(&sample("50", "", 9)), Measure::Known(50.0));
        assert_eq!(compute_remaining(&sample("50", "n/a", 9)), Measure::Known(50.0));
    }

    #[test]
    fn test_remaining_is_monotone_and_non_negative() {
        let mut previous = f64::INFINITY;
        for uses in 0..40 {
            let remaining = compute_remaining(&sample("25.5", "1.5", uses)).value().unwrap();
            assert!(remaining >= 0.0);
            assert!(remaining <= previous);
            previous = remaining;
        }
    }

    #[test]
    fn test_remaining_is_pure() {
        let s = sample("7.5", "0.25", 4);
        assert_eq!(compute_remaining(&s), compute_remaining(&s));
    }

    #[test]
    fn test_parse_reads_leading_number() {
        assert_eq!(Measure::parse("100 µL"), Measure::Known(100.0));
        assert_eq!(Measure::parse("  2.5"), Measure::Known(2.5));
        assert_eq!(Measure::parse(".5"), Measure::Known(0.5));
        assert_eq!(Measure::parse("-3"), Measure::Known(-3.0));
        assert_eq!(Measure::parse("1e2x"), Measure::Known(100.0));
        assert_eq!(Measure::parse("7."), Measure::Known(7.0));
        assert_eq!(Measure::parse("1e"), Measure::Known(1.0));
        assert_eq!(Measure::parse("."), Measure::Unknown);
        assert_eq!(Measure::parse("-"), Measure::Unknown);
        assert_eq!(Measure::parse("abc"), Measure::Unknown);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count(" 12 uses"), 12);
        assert_eq!(parse_count("-2"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("x"), 0);
    }

    #[test]
    fn test_assess_threshold_is_opt_in() {
        let status = assess(&sample("10", "5", 2));
        assert_eq!(status.remaining, Measure::Known(0.0));
        assert_eq!(status.threshold, Measure::Unknown);
        assert!(!status.low_stock);

        let mut with_threshold = sample("10", "2", 3);
        with_threshold.warn_threshold = "4".to_string();
        assert!(assess(&with_threshold).low_stock);

        with_threshold.warn_threshold = "3.9".to_string();
        assert!(!assess(&with_threshold).low_stock);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(Measure::Known(4.0), &AmountUnit::Microliter), "4.00 µL");
        assert_eq!(format_quantity(Measure::Known(1.234), &AmountUnit::Unknown), "1.23");
        assert_eq!(format_quantity(Measure::Known(0.0), &AmountUnit::Unset), "0.00");
    }
}
