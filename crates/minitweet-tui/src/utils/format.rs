use chrono::{DateTime, Local, TimeZone, Utc};

/// Format a post timestamp in local time, e.g. "Jan 05, 2024 14:30"
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    format_in(ts, &Local)
}

fn format_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%b %d, %Y %H:%M").to_string()
}

/// Short age of a local instant for the status bar
pub fn relative_age(then: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let minutes = (*now - *then).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Mask a secret for display, capped at `max_len` stars
pub fn mask(secret: &str, max_len: usize) -> String {
    "*".repeat(secret.chars().count().min(max_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn test_format_in_fixed_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 12, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_in(&ts, &plus_two), "Jan 05, 2024 14:30");
        assert_eq!(format_in(&ts, &Utc), "Jan 05, 2024 12:30");
    }

    #[test]
    fn test_relative_age() {
        let now = Local::now();
        assert_eq!(relative_age(&now, &now), "just now");
        assert_eq!(relative_age(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(relative_age(&(now - Duration::minutes(125)), &now), "2h ago");
        assert_eq!(relative_age(&(now - Duration::days(3)), &now), "3d ago");
        assert_eq!(relative_age(&(now + Duration::minutes(5)), &now), "just now");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("secret", 16), "******");
        assert_eq!(mask(&"x".repeat(40), 16), "*".repeat(16));
        assert_eq!(mask("", 16), "");
    }
}
