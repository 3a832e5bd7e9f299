use chrono::NaiveDate;

/// Format an ISO `YYYY-MM-DD` event date for display, e.g. "Monday, December 15, 2025".
/// Anything that is not a valid date is shown unchanged.
pub fn format_event_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// "<weekday, date> at <time>".
pub fn format_event_when(iso_date: &str, time: &str) -> String {
    format!("{} at {time}", format_event_date(iso_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_next_cleanup_date() {
        assert_eq!(format_event_date("2025-12-15"), "Monday, December 15, 2025");
    }

    #[test]
    fn drops_leading_zero_on_day() {
        assert_eq!(format_event_date("2026-03-01"), "Sunday, March 1, 2026");
    }

    #[test]
    fn passes_through_unparseable_dates() {
        assert_eq!(format_event_date("TBA"), "TBA");
        assert_eq!(format_event_date("2025-02-30"), "2025-02-30");
    }

    #[test]
    fn joins_date_and_time() {
        assert_eq!(
            format_event_when("2025-12-15", "09:00 AM"),
            "Monday, December 15, 2025 at 09:00 AM"
        );
    }
}
