use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// Offsets are normalized to `±HHMM` before these are tried
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
// Length of `YYYY-MM-DD`; an offset sign can only appear after it
const DATE_LEN: usize = 10;

/// Rewrite a trailing `Z`, `±HH`, `±HH:MM` or `±HHMM` as `±HHMM`. Returns
/// `None` if the timestamp carries no offset.
fn normalize_offset(ts: &str) -> Option<String> {
    if let Some(base) = ts.strip_suffix(['Z', 'z']) {
        return Some(format!("{base}+0000"));
    }
    let sign_pos = ts.get(DATE_LEN..)?.rfind(['+', '-'])? + DATE_LEN;
    let (base, offset) = ts.split_at(sign_pos);
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hhmm = match digits.len() {
        2 => format!("{digits}00"),
        4 => digits,
        _ => return None,
    };
    Some(format!("{base}{}{hhmm}", &offset[..1]))
}

/// Parse an ISO-8601-like timestamp. Timestamps without an offset are taken
/// to be UTC, and a bare date means midnight.
pub fn parse_utc(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(normalized) = normalize_offset(ts) {
        if let Some(dt) = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        {
            return Some(dt.with_timezone(&Utc));
        }
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(ts, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// 24-hour `H.MM`: hour without leading zero, minute zero-padded.
pub fn format_hour_minute(dt: &DateTime<Utc>) -> String {
    dt.format("%-H.%M").to_string()
}
