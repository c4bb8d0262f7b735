//! Human-readable rates and sizes.
//!
//! A [`UnitLadder`] walks up its units while the magnitude reaches the base:
//!
//! ```text
//! 999      bps -> "999 bps"
//! 1000     bps -> "1.00 Kbps"
//! 1536   bytes -> "1.50 KB"
//! ```
//!
//! The smallest unit renders without decimals, every larger unit with two.
//! A missing value renders as [`MISSING`]. Decimal ties round away from zero
//! (`1152 B -> "1.13 KB"`, `2.5 bps -> "3 bps"`), see [`to_fixed`].

/// Placeholder for a missing value.
pub const MISSING: &str = "-";

/// An ordered set of unit suffixes sharing one scaling base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitLadder {
    /// Scaling threshold and divisor between adjacent units.
    pub base: f64,
    /// Unit suffixes, smallest first. Must not be empty.
    pub units: &'static [&'static str],
}

/// Bits per second (SI).
pub const BPS: UnitLadder = UnitLadder {
    base: 1000.0,
    units: &["bps", "Kbps", "Mbps", "Gbps", "Tbps", "Pbps"],
};

/// Packets per second (SI).
pub const PPS: UnitLadder = UnitLadder {
    base: 1000.0,
    units: &["pps", "Kpps", "Mpps", "Gpps"],
};

/// Bytes (binary).
pub const BYTES: UnitLadder = UnitLadder {
    base: 1024.0,
    units: &["B", "KB", "MB", "GB", "TB", "PB"],
};

/// Packet counts (SI).
pub const PACKETS: UnitLadder = UnitLadder {
    base: 1000.0,
    units: &["pkts", "Kpkts", "Mpkts", "Gpkts"],
};

impl UnitLadder {
    /// Scale and render a value.
    pub fn format(&self, value: f64) -> String {
        let top = self.units.len().saturating_sub(1);
        let mut value = value;
        let mut step = 0;

        while value >= self.base && step < top {
            value /= self.base;
            step += 1;
        }

        let unit = self.units.get(step).copied().unwrap_or_default();
        let digits = if step == 0 { 0 } else { 2 };
        format!("{} {}", to_fixed(value, digits), unit)
    }

    /// Scale and render an optional value.
    pub fn format_opt(&self, value: Option<f64>) -> String {
        value.map_or_else(|| MISSING.to_string(), |v| self.format(v))
    }
}

/// Render `value` with exactly `digits` decimals.
///
/// The decimal nearest to the exact binary value wins; when the value sits
/// exactly halfway between two decimals, the one farther from zero wins.
/// `format!("{:.2}")` would pick the even digit instead.
pub fn to_fixed(value: f64, digits: usize) -> String {
    match half_step(value, digits) {
        Some(doubled) => {
            let magnitude = format!("{:0>width$}", (doubled.unsigned_abs() + 1) / 2, width = digits + 1);
            let (int, frac) = magnitude.split_at(magnitude.len() - digits);
            let sign = if doubled < 0 { "-" } else { "" };
            if digits == 0 {
                format!("{}{}", sign, int)
            } else {
                format!("{}{}.{}", sign, int, frac)
            }
        }
        None => format!("{:.*}", digits, value),
    }
}

/// `2 * value * 10^digits` when `value` is exactly halfway between two
/// `digits`-decimal numbers.
fn half_step(value: f64, digits: usize) -> Option<i64> {
    // An exact tie is odd / (2^(digits+1) * 5^digits) with the numerator a
    // multiple of 5^digits; beyond 2^53 no such value has a fraction.
    if digits > 15 || !value.is_finite() {
        return None;
    }
    let scale = 2.0 * 10f64.powi(digits as i32);
    let doubled = value * scale;
    if doubled.fract() != 0.0 || doubled.abs() >= 9_007_199_254_740_992.0 {
        return None;
    }
    let doubled = doubled as i64;
    let fives = 5i64.pow(digits as u32);
    if doubled % 2 == 0 || doubled % fives != 0 || doubled as f64 / scale != value {
        return None;
    }
    Some(doubled)
}

/// Render a number the way a JavaScript `String(number)` does: shortest
/// round-trip digits, no `-0`, integral values without a fraction, and
/// exponent form below `1e-6` and from `1e21` up.
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if value.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let exp = format!("{:e}", value);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        value.to_string()
    }
}

/// Format a bit rate: `fmt_bps(Some(1000.0)) == "1.00 Kbps"`.
pub fn fmt_bps(value: Option<f64>) -> String {
    BPS.format_opt(value)
}

/// Format a packet rate.
pub fn fmt_pps(value: Option<f64>) -> String {
    PPS.format_opt(value)
}

/// Format a byte count with binary multiples.
pub fn fmt_bytes(value: Option<f64>) -> String {
    BYTES.format_opt(value)
}

/// Format a packet count.
pub fn fmt_packets(value: Option<f64>) -> String {
    PACKETS.format_opt(value)
}
