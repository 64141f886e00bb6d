use chrono::{DateTime, TimeZone};

/// Shown once the due instant has been reached
pub const EXPIRED: &str = "Expired";
/// Shown for a due date that cannot be parsed
pub const INVALID: &str = "Invalid date";

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Remaining time until `due`, e.g. `"1d 1h 1m 1s left"`, or `"Expired"`.
///
/// Leading zero units are dropped (`"5m 0s left"`, `"42s left"`), but once a
/// larger unit is shown every smaller one follows it.
pub fn countdown<A: TimeZone, B: TimeZone>(due: &DateTime<A>, now: &DateTime<B>) -> String {
    format_remaining(due.timestamp_millis() - now.timestamp_millis())
}

/// Countdown for a stored due-date string, resolved in the zone of `now`
pub fn countdown_for<Tz: TimeZone>(raw_due: &str, now: &DateTime<Tz>) -> String {
    match super::due::resolve(raw_due, &now.timezone()) {
        Some(due) => countdown(&due, now),
        None => INVALID.to_string(),
    }
}

/// Render a millisecond difference in countdown form
pub fn format_remaining(diff_ms: i64) -> String {
    if diff_ms <= 0 {
        return EXPIRED.to_string();
    }
    let mut rest = diff_ms;
    let days = rest / DAY_MS;
    rest -= days * DAY_MS;
    let hours = rest / HOUR_MS;
    rest -= hours * HOUR_MS;
    let minutes = rest / MINUTE_MS;
    rest -= minutes * MINUTE_MS;
    let seconds = rest / SECOND_MS;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if hours > 0 || days > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    if minutes > 0 || hours > 0 || days > 0 {
        out.push_str(&format!("{}m ", minutes));
    }
    out.push_str(&format!("{}s left", seconds));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use insta::assert_snapshot;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn one_of_each_unit() {
        let due = now() + Duration::seconds(90061);
        assert_snapshot!(countdown(&due, &now()), @"1d 1h 1m 1s left");
    }

    #[test]
    fn past_and_exact_due_are_expired() {
        assert_eq!(countdown(&(now() - Duration::seconds(1)), &now()), "Expired");
        assert_eq!(countdown(&now(), &now()), "Expired");
    }

    #[test]
    fn smaller_units_follow_a_shown_larger_unit() {
        assert_eq!(format_remaining(DAY_MS), "1d 0h 0m 0s left");
        assert_eq!(format_remaining(HOUR_MS + 5 * SECOND_MS), "1h 0m 5s left");
        assert_eq!(format_remaining(5 * MINUTE_MS), "5m 0s left");
        assert_eq!(format_remaining(42 * SECOND_MS), "42s left");
    }

    #[test]
    fn sub_second_remainder_floors_to_zero() {
        assert_eq!(format_remaining(999), "0s left");
        assert_eq!(format_remaining(1), "0s left");
    }

    #[test]
    fn zones_do_not_change_the_difference() {
        let tz = chrono::FixedOffset::east_opt(5 * 3600).unwrap();
        let due = (now() + Duration::seconds(61)).with_timezone(&tz);
        assert_eq!(countdown(&due, &now()), "1m 1s left");
    }

    #[test]
    fn stored_string_resolves_in_now_zone() {
        assert_eq!(countdown_for("2026-10-18T12:00:30", &now()), "30s left");
        assert_eq!(countdown_for("2026-10-17", &now()), "Expired");
        assert_eq!(countdown_for("not a date", &now()), "Invalid date");
    }
}
