// Page entity schema

use crate::ent_framework::{EntSchema, FieldDefinition, FieldType, FieldValidator};
use crate::models::EntityType;

/// Page entity schema
pub struct PageSchema;

impl EntSchema for PageSchema {
    fn entity_type() -> EntityType {
        EntityType::Page
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("title", FieldType::String)
                .validate(FieldValidator::MaxLength(255)),
            FieldDefinition::new("body", FieldType::String),
            FieldDefinition::new("author_id", FieldType::Id).optional(),
        ]
    }
}
