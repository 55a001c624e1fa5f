// Request parameter parsing shared by the resource controllers

use axum::body::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::core::ObjectId;
use crate::ent_framework::FieldMap;
use crate::error::{AppError, AppResult};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("digits pattern is valid"));

/// `?offset=&limit=` as received. Values are checked against `\d+`; a
/// value that fails the check falls back to the default.
#[derive(Debug, Default)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Collects the paging keys from raw query pairs. A repeated key keeps
    /// its last value; other keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "offset" => params.offset = Some(value),
                "limit" => params.limit = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Returns `(limit, offset)`
    pub fn resolve(&self, default_limit: u32) -> (u32, u32) {
        let limit = parse_count("limit", self.limit.as_deref(), default_limit);
        let offset = parse_count("offset", self.offset.as_deref(), 0);
        (limit, offset)
    }
}

fn parse_count(name: &str, raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<u32>() {
        Ok(count) if DIGITS.is_match(raw) => count,
        _ => {
            debug!("Ignoring {}={:?}, using {}", name, raw, default);
            default
        }
    }
}

/// Path ids that are not a stored id shape are reported as missing resources.
pub fn parse_id(raw: &str) -> AppResult<ObjectId> {
    raw.parse::<ObjectId>()
        .map_err(|_| AppError::resource_not_found(raw))
}

/// Request body as submitted fields. An empty body submits nothing.
pub fn parse_body(body: &Bytes) -> AppResult<FieldMap> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("Malformed JSON body: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> ListParams {
        ListParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_params_use_defaults() {
        assert_eq!(params(None, None).resolve(5), (5, 0));
        assert_eq!(params(Some("2"), Some("10")).resolve(5), (2, 10));
    }

    #[test]
    fn test_non_digit_params_fall_back_to_defaults() {
        for bad in ["-1", "abc", "", "1.5", "+3", " 4"] {
            assert_eq!(params(Some(bad), Some(bad)).resolve(5), (5, 0), "accepted {:?}", bad);
        }
        assert_eq!(params(Some("7"), Some("99999999999")).resolve(5), (7, 0));
    }

    #[test]
    fn test_from_pairs_keeps_last_value() {
        let pairs = vec![
            ("limit".to_string(), "1".to_string()),
            ("sort".to_string(), "name".to_string()),
            ("limit".to_string(), "2".to_string()),
            ("offset".to_string(), "3".to_string()),
        ];
        assert_eq!(ListParams::from_pairs(pairs).resolve(5), (2, 3));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), ObjectId(42));
        match parse_id("abc") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "The resource 'abc' was not found."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(&Bytes::new()).unwrap().is_empty());
        let fields = parse_body(&Bytes::from_static(br#"{"name":"Jane"}"#)).unwrap();
        assert_eq!(fields["name"], "Jane");
        assert!(parse_body(&Bytes::from_static(b"[1,2]")).is_err());
        assert!(parse_body(&Bytes::from_static(b"{nope")).is_err());
    }
}
