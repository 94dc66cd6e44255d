//! Number formatting shared by the renderer and engine messages.

/// Format a ledger value for display.
///
/// Below 1000 the value is floored and grouped with commas; from 1000 up it
/// switches to three significant digits in scientific form (`1.23e15`).
/// Non-finite values print as `∞`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "∞".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n < 1000.0 {
        return group_thousands(n.floor() as u64);
    }
    format!("{n:.2e}")
}

/// Insert a comma every three digits (1234567 → "1,234,567").
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
