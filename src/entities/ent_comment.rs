// EntComment - comment attached to a page

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::ObjectId;
use crate::models::EntityType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<ObjectId>,
    /// Zero only on a comment that has not been bound yet
    pub page_id: ObjectId,
    pub body: String,
    pub author_id: Option<ObjectId>,
}

impl Comment {
    pub fn belongs_to(&self, page_id: ObjectId) -> bool {
        self.page_id == page_id
    }
}

impl Entity for Comment {
    const ENTITY_TYPE: EntityType = EntityType::Comment;

    fn id(&self) -> Option<ObjectId> {
        self.id
    }
}
