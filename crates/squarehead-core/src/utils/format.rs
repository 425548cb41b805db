use chrono::NaiveDate;

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

/// "Jun 04, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Human phrasing of a day count: "today", "tomorrow", "in 7 days"
pub fn format_days_until(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n if n < 0 => format!("{} days ago", -n),
        n => format!("in {} days", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Héloïse Dupont", 6), "Hél...");
    }

    #[test]
    fn test_format_days_until() {
        assert_eq!(format_days_until(0), "today");
        assert_eq!(format_days_until(1), "tomorrow");
        assert_eq!(format_days_until(14), "in 14 days");
        assert_eq!(format_days_until(-2), "2 days ago");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert_eq!(format_date(d), "Jun 04, 2025");
    }
}
