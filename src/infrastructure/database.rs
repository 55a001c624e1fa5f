// Database Interface - persistence gateway for blog documents
// Every entity is one row in a single objects table: id, type tag and a JSON document.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{ObjectId, Timestamp};
use crate::error::AppResult;
use crate::models::EntityType;

/// Stored object - a typed JSON document plus bookkeeping columns
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: ObjectId,
    pub otype: EntityType,
    pub data: Map<String, Value>,
    pub created_time: Timestamp,
    pub updated_time: Timestamp,
    pub version: u64,
}

/// Equality filter on one document field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        }
    }
}

/// Sort key; `"id"` sorts on the object id, anything else on a document field
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: OrderDirection::Ascending,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: OrderDirection::Descending,
        }
    }
}

/// Object query - the `findBy(filters, order, limit, offset)` of the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectQuery {
    pub otype: EntityType,
    pub filters: Vec<FieldFilter>,
    /// Defaults to id ascending
    pub order_by: Option<OrderBy>,
    /// `None` means no limit
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ObjectQuery {
    pub fn new(otype: EntityType) -> Self {
        Self {
            otype,
            filters: Vec::new(),
            order_by: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = FieldFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// One staged write; a flush applies a batch of these in a single transaction
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOperation {
    InsertObject {
        otype: EntityType,
        data: Map<String, Value>,
    },
    UpdateObject {
        object_id: ObjectId,
        otype: EntityType,
        data: Map<String, Value>,
    },
    DeleteObject {
        object_id: ObjectId,
        otype: EntityType,
    },
}

impl ObjectOperation {
    pub fn operation_type(&self) -> &'static str {
        match self {
            ObjectOperation::InsertObject { .. } => "insert_object",
            ObjectOperation::UpdateObject { .. } => "update_object",
            ObjectOperation::DeleteObject { .. } => "delete_object",
        }
    }
}

/// Database interface trait for the persistence gateway
#[async_trait]
pub trait DatabaseInterface: Send + Sync {
    /// Fetch one object of the given type
    async fn get_object(&self, otype: EntityType, id: ObjectId) -> AppResult<Option<Object>>;

    /// Fetch objects matching a query
    async fn get_objects(&self, query: ObjectQuery) -> AppResult<Vec<Object>>;

    /// Apply every operation atomically. Returns the inserted and updated
    /// objects, in operation order, with their ids and bookkeeping columns.
    async fn execute_operations(&self, operations: Vec<ObjectOperation>) -> AppResult<Vec<Object>>;

    /// Health check to verify database connectivity
    async fn health_check(&self) -> AppResult<()>;
}
