// Schema definitions module - one schema per entity type

pub mod author_schema;
pub mod comment_schema;
pub mod page_schema;
pub mod product_schema;

use crate::ent_framework::{EntSchema, Schema};
use crate::models::EntityType;

pub use author_schema::AuthorSchema;
pub use comment_schema::CommentSchema;
pub use page_schema::PageSchema;
pub use product_schema::ProductSchema;

/// Schema table: every entity type maps to exactly one schema.
pub fn schema_for(entity_type: EntityType) -> Schema {
    match entity_type {
        EntityType::Author => AuthorSchema::schema(),
        EntityType::Comment => CommentSchema::schema(),
        EntityType::Page => PageSchema::schema(),
        EntityType::Product => ProductSchema::schema(),
    }
}
