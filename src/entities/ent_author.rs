// EntAuthor - blog author

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::ObjectId;
use crate::models::EntityType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<ObjectId>,
    pub name: String,
    pub login: String,
    pub password: String,
}

impl Entity for Author {
    const ENTITY_TYPE: EntityType = EntityType::Author;

    fn id(&self) -> Option<ObjectId> {
        self.id
    }
}
