use chrono::DateTime;

/// Format a numeric count the way the UI shows it: `1.0K`, `2.5M`, or the
/// original string unchanged below 1000 (or when it isn't a number at all).
pub fn format_count(raw: &str) -> String {
    let Ok(n) = raw.trim().parse::<i64>() else {
        return raw.to_string();
    };
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        raw.to_string()
    }
}

/// Render an RFC 3339 publish timestamp as a short date. Unparseable input
/// passes through verbatim.
pub fn format_publish_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
