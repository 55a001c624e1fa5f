// Author entity schema
// Logins are the author's handle in URLs and bylines, so they stay URL-safe.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ent_framework::{EntSchema, FieldDefinition, FieldType, FieldValidator};
use crate::models::EntityType;

static LOGIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("login pattern is valid"));

/// Author entity schema
pub struct AuthorSchema;

impl EntSchema for AuthorSchema {
    fn entity_type() -> EntityType {
        EntityType::Author
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("name", FieldType::String)
                .validate(FieldValidator::MaxLength(255)),
            FieldDefinition::new("login", FieldType::String)
                .validate(FieldValidator::MaxLength(255))
                .validate(FieldValidator::Pattern(LOGIN_PATTERN.clone())),
            FieldDefinition::new("password", FieldType::String)
                .validate(FieldValidator::MaxLength(255)),
        ]
    }
}
