//! Typed reads over untyped upstream JSON
//!
//! Each accessor returns `None` when the key is absent, null, or holds a
//! value of the wrong JSON type. Callers pick the default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

pub fn u64(value: &Value, key: &str) -> Option<u64> {
    let field = value.get(key)?;
    field
        .as_u64()
        .or_else(|| field.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

pub fn bool(value: &Value, key: &str) -> Option<bool> {
    value.get(key)?.as_bool()
}

pub fn object<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| v.is_object())
}

pub fn array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key)?.as_array()
}

/// Read a timestamp and normalize it to `YYYY-MM-DDTHH:MM:SSZ`
pub fn datetime(value: &Value, key: &str) -> Option<String> {
    let raw = value.get(key)?.as_str()?;
    let normalized = normalize_datetime(raw);
    if normalized.is_none() {
        log::debug!("Unparseable timestamp in `{}`: {:?}", key, raw);
    }
    normalized
}

/// Accepts RFC 3339, the legacy `2013/03/23 14:58:27 +0000` form, naive
/// date-times (taken as UTC) and plain dates
pub fn normalize_datetime(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let utc = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S %z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|ndt| Utc.from_utc_datetime(&ndt))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| Utc.from_utc_datetime(&ndt))
        })?;

    Some(utc.format(OUTPUT_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_types_read_as_missing() {
        let v = json!({"title": 42, "likes_count": "many", "streamable": "yes", "user": "x"});
        assert_eq!(string(&v, "title"), None);
        assert_eq!(u64(&v, "likes_count"), None);
        assert_eq!(bool(&v, "streamable"), None);
        assert!(object(&v, "user").is_none());
        assert_eq!(string(&v, "absent"), None);
    }

    #[test]
    fn test_float_counts_are_truncated() {
        let v = json!({"duration": 1234.9, "negative": -3.0});
        assert_eq!(u64(&v, "duration"), Some(1234));
        assert_eq!(u64(&v, "negative"), None);
    }

    #[test]
    fn test_datetime_normalization() {
        assert_eq!(
            normalize_datetime("2024-05-01T12:30:00.000Z").as_deref(),
            Some("2024-05-01T12:30:00Z")
        );
        assert_eq!(
            normalize_datetime("2024-05-01T14:30:00+02:00").as_deref(),
            Some("2024-05-01T12:30:00Z")
        );
        assert_eq!(
            normalize_datetime("2013/03/23 14:58:27 +0000").as_deref(),
            Some("2013-03-23T14:58:27Z")
        );
        assert_eq!(normalize_datetime("2020-01-02").as_deref(), Some("2020-01-02T00:00:00Z"));
        assert_eq!(normalize_datetime("last tuesday"), None);
        assert_eq!(normalize_datetime(""), None);
    }
}
