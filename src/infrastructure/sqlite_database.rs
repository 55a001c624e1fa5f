use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row,
};
use std::str::FromStr;
use tracing::{debug, info};

use crate::core::{ObjectId, Timestamp};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{
    DatabaseInterface, Object, ObjectOperation, ObjectQuery,
};
use crate::models::EntityType;

// Document field names end up inside a JSON path literal, so only plain identifiers pass.
static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern is valid"));

const SELECT_OBJECTS: &str =
    "SELECT id, otype, time_created, time_updated, data, version FROM blog_objects WHERE otype = ";

const SELECT_OBJECT_BY_ID: &str = "SELECT id, otype, time_created, time_updated, data, version \
     FROM blog_objects WHERE id = ? AND otype = ?";

/// SQLite implementation of the persistence gateway
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect and make sure the objects table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid database URL {}: {}", database_url, e))
            })?
            .create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            // Each connection to an in-memory database sees its own empty database,
            // so the pool must hold exactly one connection for the process lifetime.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", database_url, e))
        })?;

        let db = Self { pool };
        db.initialize().await?;
        info!("Connected to SQLite at {}", database_url);
        Ok(db)
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the objects table and its type index if missing
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blog_objects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                otype TEXT NOT NULL,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL,
                data TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create objects table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_objects_otype ON blog_objects(otype, id)")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create objects otype index: {}", e))
            })?;

        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn json_path(field: &str) -> AppResult<String> {
    if !FIELD_NAME.is_match(field) {
        return Err(AppError::BadRequest(format!("Invalid field name '{}'", field)));
    }
    Ok(format!("$.{}", field))
}

fn row_to_object(row: &SqliteRow) -> AppResult<Object> {
    let column_err =
        |e: sqlx::Error| AppError::DatabaseError(format!("Malformed objects row: {}", e));

    let id: i64 = row.try_get("id").map_err(column_err)?;
    let otype: String = row.try_get("otype").map_err(column_err)?;
    let data: String = row.try_get("data").map_err(column_err)?;
    let time_created: i64 = row.try_get("time_created").map_err(column_err)?;
    let time_updated: i64 = row.try_get("time_updated").map_err(column_err)?;
    let version: i64 = row.try_get("version").map_err(column_err)?;

    let otype = otype.parse::<EntityType>().map_err(AppError::DatabaseError)?;
    let data = match serde_json::from_str::<Value>(&data)? {
        Value::Object(document) => document,
        other => {
            return Err(AppError::DatabaseError(format!(
                "Object {} holds a non-object document: {}",
                id, other
            )))
        }
    };

    Ok(Object {
        id: ObjectId(id),
        otype,
        data,
        created_time: Timestamp(time_created),
        updated_time: Timestamp(time_updated),
        version: u64::try_from(version).unwrap_or_default(),
    })
}

fn encode_document(document: &Map<String, Value>) -> AppResult<String> {
    Ok(serde_json::to_string(document)?)
}

#[async_trait]
impl DatabaseInterface for SqliteDatabase {
    async fn get_object(&self, otype: EntityType, id: ObjectId) -> AppResult<Option<Object>> {
        let row = sqlx::query(SELECT_OBJECT_BY_ID)
            .bind(id.value())
            .bind(otype.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to get {} {}: {}", otype, id, e))
            })?;

        row.as_ref().map(row_to_object).transpose()
    }

    async fn get_objects(&self, query: ObjectQuery) -> AppResult<Vec<Object>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_OBJECTS);
        qb.push_bind(query.otype.as_str());

        for filter in &query.filters {
            qb.push(" AND json_extract(data, '");
            qb.push(json_path(&filter.field)?);
            qb.push("')");
            match &filter.value {
                Value::Null => {
                    qb.push(" IS NULL");
                }
                Value::Bool(b) => {
                    qb.push(" = ");
                    qb.push_bind(i64::from(*b));
                }
                Value::Number(n) => {
                    qb.push(" = ");
                    if let Some(i) = n.as_i64() {
                        qb.push_bind(i);
                    } else if let Some(f) = n.as_f64() {
                        qb.push_bind(f);
                    } else {
                        return Err(AppError::BadRequest(format!(
                            "Unsupported filter value for '{}'",
                            filter.field
                        )));
                    }
                }
                Value::String(s) => {
                    qb.push(" = ");
                    qb.push_bind(s.clone());
                }
                Value::Array(_) | Value::Object(_) => {
                    return Err(AppError::BadRequest(format!(
                        "Filter on '{}' must be a scalar",
                        filter.field
                    )));
                }
            }
        }

        match &query.order_by {
            None => {
                qb.push(" ORDER BY id ASC");
            }
            Some(order) if order.field == "id" => {
                qb.push(format!(" ORDER BY id {}", order.direction.as_sql()));
            }
            Some(order) => {
                qb.push(format!(
                    " ORDER BY json_extract(data, '{}') {}, id ASC",
                    json_path(&order.field)?,
                    order.direction.as_sql()
                ));
            }
        }

        // SQLite needs a LIMIT clause before OFFSET; -1 means unbounded
        qb.push(" LIMIT ");
        qb.push_bind(query.limit.map(i64::from).unwrap_or(-1));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(query.offset));

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to query {} objects: {}", query.otype, e))
            })?;

        rows.iter().map(row_to_object).collect()
    }

    async fn execute_operations(&self, operations: Vec<ObjectOperation>) -> AppResult<Vec<Object>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to begin transaction: {}", e))
        })?;

        let now = Timestamp::now();
        let mut written = Vec::new();

        for operation in operations {
            debug!("Applying {}", operation.operation_type());
            match operation {
                ObjectOperation::InsertObject { otype, data } => {
                    let result = sqlx::query(
                        "INSERT INTO blog_objects (otype, time_created, time_updated, data, version) \
                         VALUES (?, ?, ?, ?, 1)",
                    )
                    .bind(otype.as_str())
                    .bind(now.value())
                    .bind(now.value())
                    .bind(encode_document(&data)?)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::DatabaseError(format!("Failed to insert {}: {}", otype, e))
                    })?;

                    written.push(Object {
                        id: ObjectId(result.last_insert_rowid()),
                        otype,
                        data,
                        created_time: now,
                        updated_time: now,
                        version: 1,
                    });
                }
                ObjectOperation::UpdateObject {
                    object_id,
                    otype,
                    data,
                } => {
                    let result = sqlx::query(
                        "UPDATE blog_objects SET data = ?, time_updated = ?, version = version + 1 \
                         WHERE id = ? AND otype = ?",
                    )
                    .bind(encode_document(&data)?)
                    .bind(now.value())
                    .bind(object_id.value())
                    .bind(otype.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::DatabaseError(format!(
                            "Failed to update {} {}: {}",
                            otype, object_id, e
                        ))
                    })?;

                    if result.rows_affected() == 0 {
                        // dropping the transaction rolls back earlier operations
                        return Err(AppError::DatabaseError(format!(
                            "Cannot update {} {}: it no longer exists",
                            otype, object_id
                        )));
                    }

                    let row = sqlx::query(SELECT_OBJECT_BY_ID)
                        .bind(object_id.value())
                        .bind(otype.as_str())
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::DatabaseError(format!(
                                "Failed to reload {} {}: {}",
                                otype, object_id, e
                            ))
                        })?;
                    written.push(row_to_object(&row)?);
                }
                ObjectOperation::DeleteObject { object_id, otype } => {
                    sqlx::query("DELETE FROM blog_objects WHERE id = ? AND otype = ?")
                        .bind(object_id.value())
                        .bind(otype.as_str())
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::DatabaseError(format!(
                                "Failed to delete {} {}: {}",
                                otype, object_id, e
                            ))
                        })?;
                }
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(written)
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{FieldFilter, OrderBy};
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    async fn insert(db: &SqliteDatabase, otype: EntityType, value: Value) -> Object {
        let mut written = db
            .execute_operations(vec![ObjectOperation::InsertObject {
                otype,
                data: doc(value),
            }])
            .await
            .unwrap();
        written.remove(0)
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        let a = insert(&db, EntityType::Author, json!({"name": "A"})).await;
        let b = insert(&db, EntityType::Author, json!({"name": "B"})).await;

        assert!(a.id.is_valid());
        assert!(b.id > a.id);
        assert_eq!(a.version, 1);
    }

    #[tokio::test]
    async fn test_get_object_is_scoped_by_type() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        let page = insert(&db, EntityType::Page, json!({"title": "Hello"})).await;

        let found = db.get_object(EntityType::Page, page.id).await.unwrap().unwrap();
        assert_eq!(found.data["title"], "Hello");
        assert!(db.get_object(EntityType::Author, page.id).await.unwrap().is_none());
        assert!(db.get_object(EntityType::Page, ObjectId(9999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_objects_filters_and_slices() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        for i in 0..4 {
            insert(&db, EntityType::Comment, json!({"page_id": 1, "body": format!("c{}", i)})).await;
        }
        insert(&db, EntityType::Comment, json!({"page_id": 2, "body": "other"})).await;

        let all_on_page = db
            .get_objects(ObjectQuery::new(EntityType::Comment).filter(FieldFilter::eq("page_id", 1)))
            .await
            .unwrap();
        assert_eq!(all_on_page.len(), 4);

        let window = db
            .get_objects(
                ObjectQuery::new(EntityType::Comment)
                    .filter(FieldFilter::eq("page_id", 1))
                    .limit(2)
                    .offset(1),
            )
            .await
            .unwrap();
        let bodies: Vec<&Value> = window.iter().map(|o| &o.data["body"]).collect();
        assert_eq!(bodies, [&json!("c1"), &json!("c2")]);
    }

    #[tokio::test]
    async fn test_get_objects_orders_by_document_field() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        insert(&db, EntityType::Product, json!({"name": "b", "price": 2.0})).await;
        insert(&db, EntityType::Product, json!({"name": "a", "price": 3.0})).await;

        let by_name = db
            .get_objects(ObjectQuery::new(EntityType::Product).order_by(OrderBy::asc("name")))
            .await
            .unwrap();
        assert_eq!(by_name[0].data["name"], "a");

        let by_id_desc = db
            .get_objects(ObjectQuery::new(EntityType::Product).order_by(OrderBy::desc("id")))
            .await
            .unwrap();
        assert_eq!(by_id_desc[0].data["name"], "a");
    }

    #[tokio::test]
    async fn test_invalid_filter_field_is_rejected() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        let result = db
            .get_objects(
                ObjectQuery::new(EntityType::Page).filter(FieldFilter::eq("title') OR 1=1 --", "x")),
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        let page = insert(&db, EntityType::Page, json!({"title": "v1"})).await;

        let updated = db
            .execute_operations(vec![ObjectOperation::UpdateObject {
                object_id: page.id,
                otype: EntityType::Page,
                data: doc(json!({"title": "v2"})),
            }])
            .await
            .unwrap();

        assert_eq!(updated[0].id, page.id);
        assert_eq!(updated[0].version, 2);
        assert_eq!(updated[0].data["title"], "v2");
        assert_eq!(updated[0].created_time, page.created_time);
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();

        let result = db
            .execute_operations(vec![
                ObjectOperation::InsertObject {
                    otype: EntityType::Author,
                    data: doc(json!({"name": "ghost"})),
                },
                ObjectOperation::UpdateObject {
                    object_id: ObjectId(4242),
                    otype: EntityType::Author,
                    data: doc(json!({"name": "missing"})),
                },
            ])
            .await;

        assert!(result.is_err());
        let authors = db.get_objects(ObjectQuery::new(EntityType::Author)).await.unwrap();
        assert!(authors.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let db = SqliteDatabase::new_in_memory().await.unwrap();
        let author = insert(&db, EntityType::Author, json!({"name": "A"})).await;

        db.execute_operations(vec![ObjectOperation::DeleteObject {
            object_id: author.id,
            otype: EntityType::Author,
        }])
        .await
        .unwrap();

        assert!(db.get_object(EntityType::Author, author.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_database_survives_reconnect() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("blog.db").display());

        let id = {
            let db = SqliteDatabase::connect(&url, 2).await.unwrap();
            insert(&db, EntityType::Author, json!({"name": "Persisted"})).await.id
        };

        let db = SqliteDatabase::connect(&url, 2).await.unwrap();
        let author = db.get_object(EntityType::Author, id).await.unwrap().unwrap();
        assert_eq!(author.data["name"], "Persisted");
        db.health_check().await.unwrap();
    }
}
