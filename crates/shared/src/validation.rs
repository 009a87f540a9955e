//! Common validation utilities for query parameters.

use chrono::FixedOffset;
use std::str::FromStr;
use validator::ValidationError;

/// Largest UTC offset accepted, in hours.
const MAX_OFFSET_HOURS: i32 = 14;

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Parses a comma-separated list of ids such as `"1,2, 3"`.
///
/// Blank entries are skipped; a missing value yields an empty list.
pub fn parse_id_list<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Vec<T>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>()
                .map_err(|_| error("id_list", format!("Invalid id '{}' in {}", part, field)))
        })
        .collect()
}

/// Resolves the page size for a listing.
///
/// A missing size uses `default`; anything else is clamped to `1..=max`.
pub fn clamp_page_size(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, max.max(1))
}

/// Validates that a listing offset is non-negative.
pub fn validate_offset(offset: i64) -> Result<(), ValidationError> {
    if offset >= 0 {
        Ok(())
    } else {
        Err(error("offset_range", "Offset must be non-negative".to_string()))
    }
}

/// Parses a UTC offset such as `+02:00`, `-0530`, `+5`, `Z` or `UTC`.
///
/// A missing value means UTC.
pub fn parse_utc_offset(raw: Option<&str>) -> Result<FixedOffset, ValidationError> {
    let utc = FixedOffset::east_opt(0).ok_or_else(|| invalid_offset("0"))?;

    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(utc);
    };

    if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
        return Ok(utc);
    }

    let (sign, rest) = match raw.as_bytes()[0] {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return Err(invalid_offset(raw)),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().map_err(|_| invalid_offset(raw))?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid_offset(raw))?;

    if hours > MAX_OFFSET_HOURS || !(0..60).contains(&minutes) {
        return Err(invalid_offset(raw));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| invalid_offset(raw))
}

fn invalid_offset(raw: &str) -> ValidationError {
    error(
        "time_zone",
        format!("Invalid time zone offset '{}', expected e.g. +02:00", raw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_parse_id_list_numbers() {
        let ids: Vec<i64> = parse_id_list("event_type_ids", Some("3, 1,,2 ")).unwrap();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_id_list_missing_is_empty() {
        let ids: Vec<Uuid> = parse_id_list("user_ids", None).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_id_list_rejects_garbage() {
        let err = parse_id_list::<Uuid>("user_ids", Some("not-a-uuid")).unwrap_err();
        assert_eq!(err.code, "id_list");
        assert!(err.message.unwrap().contains("user_ids"));
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(None, 10, 100), 10);
        assert_eq!(clamp_page_size(Some(0), 10, 100), 1);
        assert_eq!(clamp_page_size(Some(500), 10, 100), 100);
        assert_eq!(clamp_page_size(Some(25), 10, 100), 25);
    }

    #[test]
    fn test_validate_offset() {
        assert!(validate_offset(0).is_ok());
        assert!(validate_offset(40).is_ok());
        assert!(validate_offset(-1).is_err());
    }

    #[test]
    fn test_parse_utc_offset_defaults_to_utc() {
        assert_eq!(parse_utc_offset(None).unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(Some("UTC")).unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(Some("z")).unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_forms() {
        assert_eq!(parse_utc_offset(Some("+02:00")).unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_utc_offset(Some("-0530")).unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset(Some("+5")).unwrap().local_minus_utc(), 18000);
    }

    #[test]
    fn test_parse_utc_offset_rejects_invalid() {
        assert!(parse_utc_offset(Some("Europe/Bratislava")).is_err());
        assert!(parse_utc_offset(Some("+25:00")).is_err());
        assert!(parse_utc_offset(Some("+02:75")).is_err());
        assert!(parse_utc_offset(Some("+")).is_err());
    }
}
