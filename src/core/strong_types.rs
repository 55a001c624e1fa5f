// Strong Types - newtypes for identifiers and timestamps handed out by the gateway

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strongly-typed object ID - assigned by the persistence gateway on first flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub i64);

impl ObjectId {
    /// Create a new object ID
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn value(self) -> i64 {
        self.0
    }

    /// Check if this is a valid ID (positive)
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ObjectId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ObjectId> for i64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// Rejected path segment when parsing an [`ObjectId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidObjectId(pub String);

impl fmt::Display for InvalidObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid object id '{}'", self.0)
    }
}

impl std::error::Error for InvalidObjectId {}

// Only plain decimal digits are ids; signs and whitespace are rejected.
impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidObjectId(s.to_string()));
        }
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| InvalidObjectId(s.to_string()))
    }
}

/// Strongly-typed timestamp in milliseconds - prevents confusion with IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn new(timestamp: i64) -> Self {
        Self(timestamp)
    }

    /// Get current time in milliseconds
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(timestamp: i64) -> Self {
        Self(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_operations() {
        let id = ObjectId::new(123);
        assert_eq!(id.value(), 123);
        assert!(id.is_valid());

        let invalid_id = ObjectId::new(-1);
        assert!(!invalid_id.is_valid());
    }

    #[test]
    fn test_object_id_parsing() {
        assert_eq!("42".parse::<ObjectId>().unwrap(), ObjectId(42));
        assert!("abc".parse::<ObjectId>().is_err());
        assert!("-3".parse::<ObjectId>().is_err());
        assert!("+3".parse::<ObjectId>().is_err());
        assert!("".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_object_id_serializes_as_number() {
        let json = serde_json::to_string(&ObjectId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_timestamp_now_is_positive() {
        assert!(Timestamp::now().value() > 0);
    }
}
