use std::sync::Arc;
use tracing::info;

use crate::{
    entities::{Entity, Product},
    error::AppResult,
    infrastructure::{DatabaseInterface, ObjectManager, ObjectQuery},
};

const FIXTURE_COUNT: usize = 5;

/// Replace every stored product with the demo fixtures, in a single flush.
pub async fn load_product_fixtures(db: Arc<dyn DatabaseInterface>) -> AppResult<Vec<Product>> {
    let mut om = ObjectManager::new(db);

    let existing = om.find_by(ObjectQuery::new(Product::ENTITY_TYPE)).await?;
    for object in &existing {
        om.remove(Product::ENTITY_TYPE, object.id);
    }

    for i in 0..FIXTURE_COUNT {
        let product = Product::new(
            format!("Ananas au chocolat n°{}", i),
            12.99 + i as f64,
        );
        om.persist_entity(&product)?;
    }

    let stored = om.flush().await?;
    info!(
        "Loaded {} product fixtures (replaced {})",
        stored.len(),
        existing.len()
    );
    stored.iter().map(Product::from_object).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::SqliteDatabase;

    #[tokio::test]
    async fn test_fixtures_are_named_and_priced() {
        let db: Arc<dyn DatabaseInterface> = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let products = load_product_fixtures(db).await.unwrap();

        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Ananas au chocolat n°0");
        assert!((products[4].price - 16.99).abs() < 1e-9);
        assert!(products.iter().all(|p| p.id.is_some()));
    }

    #[tokio::test]
    async fn test_reloading_replaces_previous_fixtures() {
        let db: Arc<dyn DatabaseInterface> = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        load_product_fixtures(Arc::clone(&db)).await.unwrap();
        load_product_fixtures(Arc::clone(&db)).await.unwrap();

        let stored = db.get_objects(ObjectQuery::new(Product::ENTITY_TYPE)).await.unwrap();
        assert_eq!(stored.len(), 5);
    }
}
