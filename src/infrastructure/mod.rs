// Core infrastructure modules
pub mod database;         // Persistence gateway interface and query types
pub mod object_manager;   // Per-request unit of work
pub mod sqlite_database;  // SQLite implementation of the gateway

pub use database::{
    DatabaseInterface, FieldFilter, Object, ObjectOperation, ObjectQuery, OrderBy, OrderDirection,
};
pub use object_manager::ObjectManager;
pub use sqlite_database::SqliteDatabase;
