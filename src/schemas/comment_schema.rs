// Comment entity schema

use crate::ent_framework::{EntSchema, FieldDefinition, FieldType, FieldValidator};
use crate::models::EntityType;

/// Comment entity schema
pub struct CommentSchema;

impl EntSchema for CommentSchema {
    fn entity_type() -> EntityType {
        EntityType::Comment
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("page_id", FieldType::Id),
            FieldDefinition::new("body", FieldType::String)
                .validate(FieldValidator::MaxLength(4096)),
            FieldDefinition::new("author_id", FieldType::Id).optional(),
        ]
    }
}
