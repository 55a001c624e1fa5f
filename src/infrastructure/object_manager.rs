// Object Manager - per-request unit of work over the persistence gateway
// Writes are staged with persist/remove and applied together by flush.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::core::ObjectId;
use crate::ent_framework::Entity;
use crate::error::AppResult;
use crate::infrastructure::database::{DatabaseInterface, Object, ObjectOperation, ObjectQuery};
use crate::models::EntityType;

pub struct ObjectManager {
    db: Arc<dyn DatabaseInterface>,
    pending: Vec<ObjectOperation>,
}

impl ObjectManager {
    pub fn new(db: Arc<dyn DatabaseInterface>) -> Self {
        Self {
            db,
            pending: Vec::new(),
        }
    }

    pub async fn find(&self, otype: EntityType, id: ObjectId) -> AppResult<Option<Object>> {
        self.db.get_object(otype, id).await
    }

    pub async fn find_by(&self, query: ObjectQuery) -> AppResult<Vec<Object>> {
        self.db.get_objects(query).await
    }

    /// Stage a write. Without an id the document is inserted on flush,
    /// otherwise it replaces the stored document with that id.
    pub fn persist(&mut self, otype: EntityType, id: Option<ObjectId>, data: Map<String, Value>) {
        let operation = match id {
            Some(object_id) => ObjectOperation::UpdateObject {
                object_id,
                otype,
                data,
            },
            None => ObjectOperation::InsertObject { otype, data },
        };
        self.pending.push(operation);
    }

    pub fn persist_entity<E: Entity>(&mut self, entity: &E) -> AppResult<()> {
        let document = entity.to_document()?;
        self.persist(E::ENTITY_TYPE, entity.id(), document);
        Ok(())
    }

    pub fn remove(&mut self, otype: EntityType, id: ObjectId) {
        self.pending.push(ObjectOperation::DeleteObject {
            object_id: id,
            otype,
        });
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply every staged write in one transaction.
    ///
    /// The staged list is emptied whether or not the flush succeeds; a
    /// failed flush leaves the store untouched.
    pub async fn flush(&mut self) -> AppResult<Vec<Object>> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }
        let operations = std::mem::take(&mut self.pending);
        debug!("Flushing {} staged operations", operations.len());
        self.db.execute_operations(operations).await
    }
}
