// Resource Handler - reads through the gateway, writes through form binding
// and a one-flush unit of work

use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::ObjectId;
use crate::ent_framework::{bind, Entity, FieldMap, Schema, SubmitMode};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{DatabaseInterface, FieldFilter, ObjectManager, ObjectQuery, OrderBy};
use crate::schemas::schema_for;

/// Generic handler for one entity type.
///
/// The schema is looked up once here, so every request for `E` validates
/// against the same field table.
pub struct ResourceHandler<E: Entity> {
    db: Arc<dyn DatabaseInterface>,
    schema: Arc<Schema>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for ResourceHandler<E> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            schema: Arc::clone(&self.schema),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> ResourceHandler<E> {
    pub fn new(db: Arc<dyn DatabaseInterface>) -> Self {
        Self {
            db,
            schema: Arc::new(schema_for(E::ENTITY_TYPE)),
            _entity: PhantomData,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<Option<E>> {
        let object = self.db.get_object(E::ENTITY_TYPE, id).await?;
        object.as_ref().map(E::from_object).transpose()
    }

    /// Entities matching every filter, id ascending, sliced by offset/limit
    pub async fn list(&self, limit: u32, offset: u32, filters: Vec<FieldFilter>) -> AppResult<Vec<E>> {
        let query = ObjectQuery::new(E::ENTITY_TYPE)
            .filters(filters)
            .order_by(OrderBy::asc("id"))
            .limit(limit)
            .offset(offset);

        let objects = self.db.get_objects(query).await?;
        debug!("Listed {} {} objects", objects.len(), E::ENTITY_TYPE);
        objects.iter().map(E::from_object).collect()
    }

    pub async fn create(&self, fields: &FieldMap) -> AppResult<E> {
        let created = self.process_form(E::default(), fields, SubmitMode::Full).await?;
        info!("Created {} {:?}", E::ENTITY_TYPE, created.id());
        Ok(created)
    }

    pub async fn replace(&self, entity: E, fields: &FieldMap) -> AppResult<E> {
        self.process_form(entity, fields, SubmitMode::Full).await
    }

    pub async fn patch_partial(&self, entity: E, fields: &FieldMap) -> AppResult<E> {
        self.process_form(entity, fields, SubmitMode::Partial).await
    }

    /// Removing an id that is not stored is not an error.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let mut om = ObjectManager::new(Arc::clone(&self.db));
        if om.find(E::ENTITY_TYPE, id).await?.is_none() {
            debug!("Nothing to delete for {} {}", E::ENTITY_TYPE, id);
            return Ok(());
        }
        om.remove(E::ENTITY_TYPE, id);
        om.flush().await?;
        info!("Deleted {} {}", E::ENTITY_TYPE, id);
        Ok(())
    }

    async fn process_form(&self, entity: E, fields: &FieldMap, mode: SubmitMode) -> AppResult<E> {
        let bound = bind(&self.schema, &entity, fields, mode)?;

        let mut om = ObjectManager::new(Arc::clone(&self.db));
        om.persist_entity(&bound)?;
        let stored = om.flush().await?.into_iter().next().ok_or_else(|| {
            AppError::Internal(format!("Flush returned no {} object", E::ENTITY_TYPE))
        })?;

        E::from_object(&stored)
    }
}
