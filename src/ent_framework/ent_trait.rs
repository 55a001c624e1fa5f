// Entity Trait - identity plus document conversion for every stored resource

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::core::ObjectId;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Object;
use crate::models::EntityType;

/// Entity trait that every blog resource implements.
///
/// An entity is stored as a JSON document holding every serialized field
/// except `id`; the id lives on the storage record and is assigned by the
/// gateway on first flush.
pub trait Entity: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Entity type tag stored alongside each document
    const ENTITY_TYPE: EntityType;

    /// Gateway-assigned id; `None` until the entity has been flushed
    fn id(&self) -> Option<ObjectId>;

    /// Document form of the entity (all fields but `id`)
    fn to_document(&self) -> AppResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(mut document) => {
                document.remove("id");
                Ok(document)
            }
            other => Err(AppError::SerializationError(format!(
                "{} serialized to a non-object value: {}",
                Self::ENTITY_TYPE,
                other
            ))),
        }
    }

    /// Rebuild an entity from its document and id
    fn from_document(id: Option<ObjectId>, mut document: Map<String, Value>) -> AppResult<Self> {
        document.insert("id".to_string(), serde_json::to_value(id)?);
        serde_json::from_value(Value::Object(document)).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to decode {} document: {}",
                Self::ENTITY_TYPE,
                e
            ))
        })
    }

    /// Rebuild an entity from a stored object, checking the type tag
    fn from_object(object: &Object) -> AppResult<Self> {
        if object.otype != Self::ENTITY_TYPE {
            return Err(AppError::Internal(format!(
                "Object {} is a {}, not a {}",
                object.id,
                object.otype,
                Self::ENTITY_TYPE
            )));
        }
        Self::from_document(Some(object.id), object.data.clone())
    }
}
