// EntPage - blog page, optionally written by an author

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::ObjectId;
use crate::models::EntityType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Option<ObjectId>,
    pub title: String,
    pub body: String,
    pub author_id: Option<ObjectId>,
}

impl Entity for Page {
    const ENTITY_TYPE: EntityType = EntityType::Page;

    fn id(&self) -> Option<ObjectId> {
        self.id
    }
}
