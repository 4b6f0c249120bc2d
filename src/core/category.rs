//! Category business logic.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Category payload for creation and config seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    /// Category name, unique
    pub name: String,
}

/// Lists all categories by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Ok(Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

/// Retrieves a category by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_category(db: &DatabaseConnection, category_id: i64) -> Result<Option<category::Model>> {
    Ok(Category::find_by_id(category_id).one(db).await?)
}

/// Retrieves a category by exact name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_category_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<category::Model>> {
    Ok(Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// Creates a category.
///
/// # Errors
/// Returns an error if the name is empty or already taken, or the insert fails.
#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, input: CategoryInput) -> Result<category::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    if get_category_by_name(db, &name).await?.is_some() {
        return Err(Error::validation(format!("Category '{name}' already exists")));
    }

    let category = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(category_id = category.id, name = %category.name, "Category created");
    Ok(category)
}

/// Creates every configured category that does not exist yet.
///
/// Returns how many were created.
///
/// # Errors
/// Returns an error if a database operation fails.
#[instrument(skip(db, seeds), fields(count = seeds.len()))]
pub async fn seed_categories(db: &DatabaseConnection, seeds: &[CategoryInput]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if get_category_by_name(db, seed.name.trim()).await?.is_some() {
            debug!(name = %seed.name, "Category already present");
            continue;
        }
        create_category(db, seed.clone()).await?;
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_list_categories() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Paket Buka Puasa").await?;
        create_test_category(&db, "Minuman").await?;

        let categories = list_categories(&db).await?;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "Minuman");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicates_and_blank() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Minuman").await?;

        let duplicate = create_category(
            &db,
            CategoryInput {
                name: " Minuman ".to_string(),
            },
        )
        .await;
        assert!(matches!(duplicate, Err(Error::Validation { .. })));

        let blank = create_category(
            &db,
            CategoryInput {
                name: String::new(),
            },
        )
        .await;
        assert!(matches!(blank, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_categories_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            CategoryInput {
                name: "Paket Buka Puasa".to_string(),
            },
            CategoryInput {
                name: "Takjil".to_string(),
            },
        ];

        assert_eq!(seed_categories(&db, &seeds).await?, 2);
        assert_eq!(seed_categories(&db, &seeds).await?, 0);
        assert_eq!(list_categories(&db).await?.len(), 2);
        Ok(())
    }
}
