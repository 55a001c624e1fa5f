// Form binding - validates submitted fields against a schema and merges them
// into an entity snapshot. Binding never mutates the snapshot it is given.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::ent_schema::{FieldDefinition, FieldType, FieldValidator, Schema};
use super::ent_trait::Entity;
use crate::error::{AppError, AppResult};

/// Submitted field values, keyed by field name
pub type FieldMap = Map<String, Value>;

/// Key under which errors that belong to no single field are reported
pub const FORM_ERROR_KEY: &str = "_form";

pub const MSG_NOT_BLANK: &str = "This value should not be blank.";
pub const MSG_INVALID: &str = "This value is not valid.";
pub const MSG_EXTRA_FIELDS: &str = "This form should not contain extra fields.";

/// How missing fields are treated when binding a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// POST/PUT: missing fields are cleared to their default (or null)
    Full,
    /// PATCH: missing fields keep the snapshot's value
    Partial,
}

impl SubmitMode {
    pub fn clears_missing(self) -> bool {
        matches!(self, SubmitMode::Full)
    }
}

/// Per-field validation messages, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Binds `fields` onto `document` according to `schema` and `mode`.
///
/// Returns the merged document, or every validation failure found. Keys of
/// `document` that the schema does not know about are carried through as-is.
pub fn bind_document(
    schema: &Schema,
    document: &FieldMap,
    fields: &FieldMap,
    mode: SubmitMode,
) -> Result<FieldMap, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut merged = document.clone();

    if fields.keys().any(|key| !schema.has_field(key)) {
        errors.add(FORM_ERROR_KEY, MSG_EXTRA_FIELDS);
    }

    for field in &schema.fields {
        let raw = match fields.get(&field.name) {
            Some(value) => value.clone(),
            None if mode.clears_missing() => field
                .default
                .as_ref()
                .map(|d| d.to_json())
                .unwrap_or(Value::Null),
            None => document.get(&field.name).cloned().unwrap_or(Value::Null),
        };

        match normalize(field.field_type, raw) {
            Some(value) => {
                check_field(field, &value, &mut errors);
                merged.insert(field.name.clone(), value);
            }
            None => errors.add(&field.name, MSG_INVALID),
        }
    }

    if errors.is_empty() {
        Ok(merged)
    } else {
        Err(errors)
    }
}

/// Binds `fields` onto a copy of `snapshot`, keeping its id.
///
/// Validation failures surface as [`AppError::Validation`].
pub fn bind<E: Entity>(
    schema: &Schema,
    snapshot: &E,
    fields: &FieldMap,
    mode: SubmitMode,
) -> AppResult<E> {
    let document = snapshot.to_document()?;
    let merged = bind_document(schema, &document, fields, mode).map_err(AppError::Validation)?;
    E::from_document(snapshot.id(), merged)
}

/// Coerces a submitted value to the field's JSON shape. `None` means the
/// value cannot represent the type. Blank strings count as "no value".
fn normalize(field_type: FieldType, value: Value) -> Option<Value> {
    if let Value::String(s) = &value {
        if s.trim().is_empty() {
            return Some(Value::Null);
        }
    }
    if value.is_null() {
        return Some(Value::Null);
    }

    match field_type {
        FieldType::String => match value {
            Value::String(_) => Some(value),
            Value::Number(n) => Some(Value::String(n.to_string())),
            _ => None,
        },
        FieldType::Int64 => match &value {
            Value::Number(n) => n.as_i64().map(Value::from),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        FieldType::Id => {
            let id = match &value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) if s.bytes().all(|b| b.is_ascii_digit()) => s.parse::<i64>().ok(),
                _ => None,
            };
            id.filter(|id| *id > 0).map(Value::from)
        }
        FieldType::Float => {
            let f = match &value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            f.and_then(Number::from_f64).map(Value::Number)
        }
        FieldType::Bool => match &value {
            Value::Bool(_) => Some(value),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(Value::Bool(false)),
                Some(1) => Some(Value::Bool(true)),
                _ => None,
            },
            Value::String(s) => match s.as_str() {
                "1" | "true" => Some(Value::Bool(true)),
                "0" | "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
    }
}

fn check_field(field: &FieldDefinition, value: &Value, errors: &mut FieldErrors) {
    if value.is_null() {
        if field.is_required() {
            errors.add(&field.name, MSG_NOT_BLANK);
        }
        return;
    }

    for validator in &field.validators {
        if let Some(message) = check_validator(validator, value) {
            errors.add(&field.name, message);
        }
    }
}

fn check_validator(validator: &FieldValidator, value: &Value) -> Option<String> {
    match (validator, value) {
        (FieldValidator::MinLength(min), Value::String(s)) if s.chars().count() < *min => Some(
            format!("This value is too short. It should have {} characters or more.", min),
        ),
        (FieldValidator::MaxLength(max), Value::String(s)) if s.chars().count() > *max => Some(
            format!("This value is too long. It should have {} characters or less.", max),
        ),
        (FieldValidator::Pattern(pattern), Value::String(s)) if !pattern.is_match(s) => {
            Some(MSG_INVALID.to_string())
        }
        (FieldValidator::Range(min, max), Value::Number(n)) => match n.as_f64() {
            Some(v) if v >= *min && v <= *max => None,
            _ => Some(format!("This value should be between {} and {}.", min, max)),
        },
        _ => None,
    }
}
