// Blog entity type system - every stored document carries one of these tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Author,
    // Pages are the fallback resource type
    #[default]
    Page,
    Comment,
    Product,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Author,
        EntityType::Page,
        EntityType::Comment,
        EntityType::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Author => "author",
            EntityType::Page => "page",
            EntityType::Comment => "comment",
            EntityType::Product => "product",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names are rejected; there is no silent fallback when parsing.
impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown entity type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trips_through_str() {
        for entity_type in EntityType::ALL {
            assert_eq!(entity_type.as_str().parse::<EntityType>(), Ok(entity_type));
        }
    }

    #[test]
    fn test_unknown_entity_type_is_rejected() {
        assert!("post".parse::<EntityType>().is_err());
        assert!("Author".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_default_entity_type_is_page() {
        assert_eq!(EntityType::default(), EntityType::Page);
    }
}
