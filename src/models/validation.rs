use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check that every named key is present in the request body.
///
/// A key set to `null` counts as present; typed decoding decides whether
/// null is acceptable. All missing names are reported together.
pub fn require_fields(payload: &Value, names: &[&str]) -> ApiResult<()> {
    let missing: Vec<String> = match payload.as_object() {
        Some(object) => names
            .iter()
            .filter(|name| !object.contains_key(**name))
            .map(|name| name.to_string())
            .collect(),
        None => names.iter().map(|name| name.to_string()).collect(),
    };

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingFields(missing))
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(text: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ApiError::InvalidDateFormat(text.to_string()))
}

pub fn parse_optional_date(text: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    text.map(parse_date).transpose()
}

/// End must be strictly after start.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
    if end <= start {
        return Err(ApiError::InvalidDateRange);
    }
    Ok(())
}

/// Decode a JSON body into a typed request after the presence check.
pub fn decode_payload<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
    serde_json::from_value(payload).map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_fields_reports_every_missing_name() {
        let payload = json!({ "progression_type": "linear" });
        let err = require_fields(&payload, &["name", "user_id"]).unwrap_err();
        match err {
            ApiError::MissingFields(names) => assert_eq!(names, vec!["name", "user_id"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_fields_accepts_null_values() {
        let payload = json!({ "name": null, "user_id": 1 });
        assert!(require_fields(&payload, &["name", "user_id"]).is_ok());
    }

    #[test]
    fn test_require_fields_non_object_body() {
        let err = require_fields(&json!([1, 2, 3]), &["name"]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: name");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(matches!(parse_date("15/01/2024"), Err(ApiError::InvalidDateFormat(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(ApiError::InvalidDateFormat(_))));
        assert!(parse_optional_date(None).unwrap().is_none());
    }

    #[test]
    fn test_check_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(check_date_range(start, end).is_ok());
        assert!(matches!(check_date_range(end, start), Err(ApiError::InvalidDateRange)));
        assert!(matches!(check_date_range(start, start), Err(ApiError::InvalidDateRange)));
    }

    #[test]
    fn test_decode_payload_rejects_wrong_types() {
        #[derive(serde::Deserialize, Debug)]
        struct Sample {
            #[allow(dead_code)]
            count: i32,
        }

        assert!(decode_payload::<Sample>(json!({ "count": 3 })).is_ok());
        assert!(matches!(
            decode_payload::<Sample>(json!({ "count": "three" })),
            Err(ApiError::BadRequest(_))
        ));
    }
}
