// EntProduct - catalogue fixture entity

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::ObjectId;
use crate::models::EntityType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ObjectId>,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }
}

impl Entity for Product {
    const ENTITY_TYPE: EntityType = EntityType::Product;

    fn id(&self) -> Option<ObjectId> {
        self.id
    }
}
