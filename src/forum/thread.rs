//! Thread model and repository for dsforum.
//!
//! Threads are append-only: created by an authenticated user, never edited
//! or deleted by the application.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::{ForumError, Result};

/// A top-level discussion post within a category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Thread {
    /// Unique thread ID.
    pub id: i64,
    /// Author user ID.
    pub user_id: i64,
    /// Category the thread belongs to.
    pub category_id: i64,
    /// Thread title.
    pub title: String,
    /// Thread body text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

/// A thread joined with its author's username and category name,
/// as shown on the thread page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThreadView {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    /// Author username.
    pub username: String,
    /// Name of the thread's category.
    pub category_name: String,
}

/// A thread row for category listings, joined with the author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThreadSummary {
    pub id: i64,
    pub title: String,
    pub username: String,
    pub created_at: NaiveDateTime,
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Author user ID.
    pub user_id: i64,
    /// Category the thread belongs to.
    pub category_id: i64,
    /// Thread title (validated and trimmed by the caller).
    pub title: String,
    /// Thread body (validated and trimmed by the caller).
    pub body: String,
}

impl NewThread {
    /// Create a new thread record.
    pub fn new(
        user_id: i64,
        category_id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            category_id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Repository for thread persistence operations.
pub struct ThreadRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new thread in the database.
    ///
    /// Returns the created thread with the assigned ID.
    pub async fn create(&self, new_thread: &NewThread) -> Result<Thread> {
        let result = sqlx::query(
            "INSERT INTO threads (user_id, category_id, title, body) VALUES (?, ?, ?, ?)",
        )
        .bind(new_thread.user_id)
        .bind(new_thread.category_id)
        .bind(&new_thread.title)
        .bind(&new_thread.body)
        .execute(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        let thread = sqlx::query_as::<_, Thread>(
            "SELECT id, user_id, category_id, title, body, created_at
             FROM threads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        thread.ok_or_else(|| ForumError::NotFound("thread".to_string()))
    }

    /// Get a thread by ID with the author's username and category name joined.
    pub async fn get(&self, id: i64) -> Result<Option<ThreadView>> {
        let result = sqlx::query_as::<_, ThreadView>(
            "SELECT t.id, t.user_id, t.category_id, t.title, t.body, t.created_at,
                    u.username, c.name AS category_name
             FROM threads t
             JOIN users u ON t.user_id = u.id
             JOIN categories c ON t.category_id = c.id
             WHERE t.id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List threads in a category, newest first, with pagination.
    pub async fn list_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ThreadSummary>> {
        let threads = sqlx::query_as::<_, ThreadSummary>(
            "SELECT t.id, t.title, u.username, t.created_at
             FROM threads t
             JOIN users u ON t.user_id = u.id
             WHERE t.category_id = ?
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(threads)
    }

    /// List recent threads across all categories, newest first, with pagination.
    pub async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<ThreadView>> {
        let threads = sqlx::query_as::<_, ThreadView>(
            "SELECT t.id, t.user_id, t.category_id, t.title, t.body, t.created_at,
                    u.username, c.name AS category_name
             FROM threads t
             JOIN users u ON t.user_id = u.id
             JOIN categories c ON t.category_id = c.id
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(threads)
    }

    /// Count all threads.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM threads")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ForumError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Count threads in a category.
    pub async fn count_by_category(&self, category_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM threads WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| ForumError::Database(e.to_string()))?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn create_test_user(db: &Database, name: &str) -> i64 {
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new(name, "hash")).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_thread() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        let new_thread = NewThread::new(user_id, 1, "Test Thread", "Some body content");
        let thread = repo.create(&new_thread).await.unwrap();

        assert_eq!(thread.user_id, user_id);
        assert_eq!(thread.category_id, 1);
        assert_eq!(thread.title, "Test Thread");
        assert_eq!(thread.body, "Some body content");
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        let created = repo
            .create(&NewThread::new(user_id, 2, "Round Trip", "Body text of the thread"))
            .await
            .unwrap();

        let view = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(view.title, "Round Trip");
        assert_eq!(view.body, "Body text of the thread");
        assert_eq!(view.username, "alice");
        assert_eq!(view.category_id, 2);
        assert!(!view.category_name.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_thread() {
        let db = setup_db().await;
        let repo = ThreadRepository::new(db.pool());

        let not_found = repo.get(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_list_by_category_newest_first() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        for i in 1..=3 {
            repo.create(&NewThread::new(
                user_id,
                1,
                format!("Thread {i}"),
                "Body text here",
            ))
            .await
            .unwrap();
        }
        // A thread in another category must not appear
        repo.create(&NewThread::new(user_id, 2, "Elsewhere", "Body text here"))
            .await
            .unwrap();

        let threads = repo.list_by_category(1, 10, 0).await.unwrap();
        assert_eq!(threads.len(), 3);
        assert_eq!(threads[0].title, "Thread 3");
        assert_eq!(threads[1].title, "Thread 2");
        assert_eq!(threads[2].title, "Thread 1");
        assert_eq!(threads[0].username, "alice");
    }

    #[tokio::test]
    async fn test_list_by_category_paginated() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        for i in 1..=5 {
            repo.create(&NewThread::new(
                user_id,
                1,
                format!("Thread {i}"),
                "Body text here",
            ))
            .await
            .unwrap();
        }

        let page1 = repo.list_by_category(1, 2, 0).await.unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].title, "Thread 5");
        assert_eq!(page1[1].title, "Thread 4");

        let page2 = repo.list_by_category(1, 2, 2).await.unwrap();
        assert_eq!(page2.len(), 2);
        assert_eq!(page2[0].title, "Thread 3");
        assert_eq!(page2[1].title, "Thread 2");
    }

    #[tokio::test]
    async fn test_list_recent_spans_categories() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        repo.create(&NewThread::new(user_id, 1, "First", "Body text here"))
            .await
            .unwrap();
        repo.create(&NewThread::new(user_id, 2, "Second", "Body text here"))
            .await
            .unwrap();

        let recent = repo.list_recent(10, 0).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Second");
        assert_eq!(recent[1].title, "First");
        assert!(!recent[0].category_name.is_empty());
    }

    #[tokio::test]
    async fn test_count_by_category() {
        let db = setup_db().await;
        let user_id = create_test_user(&db, "alice").await;
        let repo = ThreadRepository::new(db.pool());

        assert_eq!(repo.count_by_category(1).await.unwrap(), 0);

        repo.create(&NewThread::new(user_id, 1, "Thread 1", "Body text here"))
            .await
            .unwrap();
        repo.create(&NewThread::new(user_id, 1, "Thread 2", "Body text here"))
            .await
            .unwrap();
        repo.create(&NewThread::new(user_id, 2, "Thread 3", "Body text here"))
            .await
            .unwrap();

        assert_eq!(repo.count_by_category(1).await.unwrap(), 2);
        assert_eq!(repo.count_by_category(2).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
