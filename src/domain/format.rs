//! Display helpers shared by the status and stats tables.

const BYTE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Placeholder for values that cannot be shown
pub const NOT_AVAILABLE: &str = "N/A";

/// Scales a byte count into the largest unit that keeps it under 1024.
///
/// Negative or non-finite input yields `N/A`. Scaled values are rounded to two
/// decimals and printed in shortest form (`1.0KB`, `1.5KB`, `1.23MB`); a whole
/// count that never needed scaling prints without a fraction (`512B`).
pub fn format_bytes(n: f64) -> String {
    if !n.is_finite() || n < 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    if n == 0.0 {
        return "0B".to_string();
    }

    let mut value = n;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 && value.fract() == 0.0 {
        return format!("{}{}", value as u64, BYTE_UNITS[0]);
    }
    format!("{}{}", round_hundredths(value), BYTE_UNITS[unit])
}

/// Convenience wrapper for the runtime's unsigned counters.
pub fn format_byte_count(n: u64) -> String {
    format_bytes(n as f64)
}

// Correctly rounded to two places, then printed in the shortest form that
// round-trips, always keeping at least one fractional digit.
fn round_hundredths(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let rounded: f64 = fixed.parse().unwrap_or(value);
    format!("{:?}", rounded)
}

/// `{:.2}%`, or `N/A` when the runtime did not report a usable figure.
pub fn format_cpu_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) if p.is_finite() => format!("{:.2}%", p),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Cumulative CPU nanoseconds as `HH:MM:SS`. Hours do not wrap.
pub fn format_cpu_time(nanos: Option<u64>) -> String {
    let Some(nanos) = nanos else {
        return NOT_AVAILABLE.to_string();
    };
    let seconds = nanos / 1_000_000_000;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Names longer than `max` characters keep `max - 3` characters plus `...`.
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let kept: String = name.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Hard cut to `width` characters, no marker.
pub fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Keeps the last `max` characters of `text`.
pub fn keep_tail(text: &str, max: usize) -> &str {
    let count = text.chars().count();
    if count <= max {
        return text;
    }
    let skip = count - max;
    match text.char_indices().nth(skip) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}
