use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

/// Human file size in base 1024, two decimals at most (e.g. "1.5 KB").
/// Sizes past the gigabyte range stay expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Relative French wording for recent dates, long French date beyond a week.
pub fn format_relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(date);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if diff.num_seconds() < 60 {
        "À l'instant".to_string()
    } else if minutes < 60 {
        format!("Il y a {} minute{}", minutes, plural(minutes))
    } else if hours < 24 {
        format!("Il y a {} heure{}", hours, plural(hours))
    } else if days < 7 {
        format!("Il y a {} jour{}", days, plural(days))
    } else {
        format_long_date(date)
    }
}

/// Parse a server timestamp (RFC 3339, or naive ISO read as UTC) and format it relative to `now`.
pub fn format_date(input: &str, now: DateTime<Utc>) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(input)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
        })
        .ok()?;
    Some(format_relative_date(date, now))
}

/// "17 octobre 2026"
pub fn format_long_date(date: DateTime<Utc>) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_FR[date.month0() as usize],
        date.year()
    )
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 300 * 1024), "5.29 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_relative_date_buckets() {
        let now = now();
        assert_eq!(format_relative_date(now - Duration::seconds(30), now), "À l'instant");
        assert_eq!(format_relative_date(now - Duration::minutes(1), now), "Il y a 1 minute");
        assert_eq!(format_relative_date(now - Duration::minutes(45), now), "Il y a 45 minutes");
        assert_eq!(format_relative_date(now - Duration::hours(1), now), "Il y a 1 heure");
        assert_eq!(format_relative_date(now - Duration::hours(23), now), "Il y a 23 heures");
        assert_eq!(format_relative_date(now - Duration::days(1), now), "Il y a 1 jour");
        assert_eq!(format_relative_date(now - Duration::days(6), now), "Il y a 6 jours");
        assert_eq!(format_relative_date(now - Duration::days(7), now), "10 octobre 2026");
    }

    #[test]
    fn test_future_date_reads_as_now() {
        let now = now();
        assert_eq!(format_relative_date(now + Duration::hours(2), now), "À l'instant");
    }

    #[test]
    fn test_format_date_parses_server_timestamps() {
        let now = now();
        assert_eq!(
            format_date("2026-10-17T11:30:00Z", now).as_deref(),
            Some("Il y a 30 minutes")
        );
        assert_eq!(
            format_date("2026-08-01T09:15:00.123456", now).as_deref(),
            Some("1 août 2026")
        );
        assert_eq!(format_date("hier", now), None);
    }
}
