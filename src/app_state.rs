use std::sync::Arc;

use crate::{
    config::Config,
    handlers::{AuthorHandler, CommentHandler, PageHandler},
    infrastructure::{DatabaseInterface, SqliteDatabase},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub database: Arc<dyn DatabaseInterface>,
    pub authors: AuthorHandler,
    pub pages: PageHandler,
    pub comments: CommentHandler,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database =
            SqliteDatabase::connect(&config.database.url, config.database.max_connections).await?;
        Ok(Self::from_database(config, Arc::new(database)))
    }

    /// Wire every handler to the same gateway
    pub fn from_database(config: Config, database: Arc<dyn DatabaseInterface>) -> Self {
        Self {
            authors: AuthorHandler::new(Arc::clone(&database)),
            pages: PageHandler::new(Arc::clone(&database)),
            comments: CommentHandler::new(Arc::clone(&database)),
            database,
            config,
        }
    }
}
