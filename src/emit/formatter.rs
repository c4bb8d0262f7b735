//! Edge value labels.

use crate::format::{plain_number, BPS, BYTES, PPS};

/// Strategy that renders an edge value as label text.
///
/// Implemented for any `Fn(f64, Option<&str>) -> String`, so a closure can be
/// passed to [`emit_dot_with`](super::emit_dot_with) directly.
pub trait ValueFormatter {
    /// Render `value` given the configured `units`.
    fn format_value(&self, value: f64, units: Option<&str>) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(f64, Option<&str>) -> String,
{
    fn format_value(&self, value: f64, units: Option<&str>) -> String {
        self(value, units)
    }
}

/// The formatter used by [`emit_dot`](super::emit_dot).
///
/// Units are matched case-insensitively:
///
/// | Units | Ladder |
/// |-------|--------|
/// | `l3bps`, `bps` | bps … Pbps, base 1000 |
/// | `pps` | pps … Gpps, base 1000 |
/// | `bytes` | B … PB, base 1024 |
/// | anything else | the plain number, as JavaScript prints it |
///
/// Non-finite values render as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueFormatter;

impl ValueFormatter for DefaultValueFormatter {
    fn format_value(&self, value: f64, units: Option<&str>) -> String {
        let value = if value.is_finite() { value } else { 0.0 };

        match units.map(str::to_ascii_lowercase).as_deref() {
            Some("l3bps" | "bps") => BPS.format(value),
            Some("pps") => PPS.format(value),
            Some("bytes") => BYTES.format(value),
            _ => plain_number(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_units_are_case_insensitive() {
        let f = DefaultValueFormatter;
        assert_eq!(f.format_value(2_000_000.0, Some("L3BPS")), "2.00 Mbps");
        assert_eq!(f.format_value(999.0, Some("bps")), "999 bps");
        assert_eq!(f.format_value(1500.0, Some("Pps")), "1.50 Kpps");
        assert_eq!(f.format_value(2048.0, Some("bytes")), "2.00 KB");
    }

    #[test]
    fn test_default_falls_back_to_plain_number() {
        let f = DefaultValueFormatter;
        assert_eq!(f.format_value(42.0, None), "42");
        assert_eq!(f.format_value(2.5, Some("l2bps")), "2.5");
        assert_eq!(f.format_value(f64::NAN, Some("bps")), "0 bps");
        assert_eq!(f.format_value(-0.0, None), "0");
        assert_eq!(f.format_value(1e21, Some("l2bps")), "1e+21");
    }

    #[test]
    fn test_closures_are_formatters() {
        let f = |value: f64, units: Option<&str>| format!("{}{}", value, units.unwrap_or("?"));
        assert_eq!(f.format_value(3.0, Some("x")), "3x");
    }
}
