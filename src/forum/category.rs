//! Category model and repository for dsforum.
//!
//! Categories are static reference data seeded by a migration; the
//! application only reads them.

use sqlx::SqlitePool;

use crate::{ForumError, Result};

/// A static grouping under which threads are organized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: i64,
    /// Category name.
    pub name: String,
    /// Short description shown on the index page.
    pub description: String,
}

/// Repository for category read operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new CategoryRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories, ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(categories)
    }

    /// Get a category by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Count all categories.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ForumError::Database(e.to_string()))?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        let categories = repo.list().await.unwrap();
        assert_eq!(categories.len(), 3);

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        let found = repo.get_by_id(1).await.unwrap();
        assert!(found.is_some());
        assert!(!found.unwrap().name.is_empty());

        let not_found = repo.get_by_id(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let db = setup_db().await;
        let repo = CategoryRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
