// Ent Framework - entity schema system, entity trait and form binding

pub mod ent_schema;
pub mod ent_trait;
pub mod form;

// Re-export all ent framework types for convenience
pub use ent_schema::*;
pub use ent_trait::Entity;
pub use form::{bind, bind_document, FieldErrors, FieldMap, SubmitMode, FORM_ERROR_KEY};
