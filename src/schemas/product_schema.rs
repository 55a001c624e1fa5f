// Product entity schema (fixture data only, not routed)

use crate::ent_framework::{EntSchema, FieldDefinition, FieldType, FieldValidator};
use crate::models::EntityType;

pub struct ProductSchema;

impl EntSchema for ProductSchema {
    fn entity_type() -> EntityType {
        EntityType::Product
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("name", FieldType::String)
                .validate(FieldValidator::MaxLength(255)),
            FieldDefinition::new("price", FieldType::Float)
                .validate(FieldValidator::Range(0.0, 1_000_000.0)),
        ]
    }
}
