//! Display helpers shared by the dashboard panels.

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

/// Round to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Fraction rendered as a percentage, e.g. `0.123` with 1 digit → `"12.3%"`.
pub fn format_percent(fraction: f64, digits: usize) -> String {
    format!("{:.*}%", digits, fraction * 100.0)
}

/// Value with an explicit sign, e.g. `"+12.34"` / `"-8.90"`.
pub fn format_signed(value: f64, digits: usize) -> String {
    if value >= 0.0 {
        format!("+{:.*}", digits, value)
    } else {
        format!("{:.*}", digits, value)
    }
}

/// Shortest decimal form of a coordinate, rounded to thousandths.
pub fn format_coord(value: f64) -> String {
    let r = round_to(value, 3);
    // avoid "-0"
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{}", r)
}

pub fn change_arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "↑"
    } else if change < 0.0 {
        "↓"
    } else {
        "→"
    }
}

/// Thousands-separated integer part, e.g. `4567.89` → `"4,567.89"`.
pub fn format_grouped(value: f64, digits: usize) -> String {
    let raw = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (raw.clone(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(42.5, 0.0, 100.0), 42.5);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4567.891, 2), 4567.89);
        assert_eq!(round_to(22.06, 1), 22.1);
    }

    #[test]
    fn test_percent_and_signed() {
        assert_eq!(format_percent(0.123, 1), "12.3%");
        assert_eq!(format_percent(0.5, 0), "50%");
        assert_eq!(format_signed(12.34, 2), "+12.34");
        assert_eq!(format_signed(-8.9, 2), "-8.90");
    }

    #[test]
    fn test_format_coord_trims() {
        assert_eq!(format_coord(140.0), "140");
        assert_eq!(format_coord(140.000_000_000_006), "140");
        assert_eq!(format_coord(-0.0001), "0");
        assert_eq!(format_coord(106.1257), "106.126");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(format_grouped(4567.89, 2), "4,567.89");
        assert_eq!(format_grouped(14234.5, 2), "14,234.50");
        assert_eq!(format_grouped(-1987.65, 2), "-1,987.65");
        assert_eq!(format_grouped(999.0, 0), "999");
    }
}
