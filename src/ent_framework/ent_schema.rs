// Ent Schema Framework - schema-as-code for the blog resources
// Each entity type declares its submittable fields once; the form binder reads them.

use regex::Regex;
use serde::{Serialize, Serializer};
use crate::models::EntityType;

/// Schema definition trait - one implementation per entity type
pub trait EntSchema: Send + Sync {
    /// Entity type this schema defines
    fn entity_type() -> EntityType where Self: Sized;

    /// Define fields for this entity
    fn fields() -> Vec<FieldDefinition> where Self: Sized;

    /// Materialise the schema into a value that can be stored on a handler
    fn schema() -> Schema where Self: Sized {
        Schema {
            entity_type: Self::entity_type(),
            fields: Self::fields(),
        }
    }
}

/// Resolved schema of one entity type
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub entity_type: EntityType,
    pub fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Field definition - name, type, requiredness and validators
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<FieldValidator>,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            optional: false,
            default: None,
            validators: Vec::new(),
        }
    }

    /// Mark field as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Add default value, used when a full submission omits the field
    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Add field validator
    pub fn validate(mut self, validator: FieldValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

/// Field types understood by the form binder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int64,
    Float,
    Bool,
    /// Reference to another stored object
    Id,
}

/// Field default values
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    String(String),
    Int64(i64),
    Float(f64),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldDefault::String(s) => serde_json::Value::from(s.clone()),
            FieldDefault::Int64(i) => serde_json::Value::from(*i),
            FieldDefault::Float(f) => serde_json::Value::from(*f),
            FieldDefault::Bool(b) => serde_json::Value::from(*b),
        }
    }
}

/// Field validators
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum FieldValidator {
    MinLength(usize),
    MaxLength(usize),
    /// Compiled once with the schema; clients see the pattern source
    Pattern(#[serde(serialize_with = "serialize_pattern")] Regex),
    Range(f64, f64), // Min, Max for numeric types
}

fn serialize_pattern<S: Serializer>(pattern: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(pattern.as_str())
}
