//! Reply model and repository for dsforum.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::{ForumError, Result};

/// A reply to a thread.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Reply {
    /// Unique reply ID.
    pub id: i64,
    /// Thread the reply belongs to.
    pub thread_id: i64,
    /// Author user ID.
    pub user_id: i64,
    /// Reply body text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

/// A reply joined with its author's username, as shown on the thread page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReplyView {
    pub id: i64,
    pub thread_id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: NaiveDateTime,
    /// Author username.
    pub username: String,
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Thread the reply belongs to.
    pub thread_id: i64,
    /// Author user ID.
    pub user_id: i64,
    /// Reply body (validated and trimmed by the caller).
    pub body: String,
}

impl NewReply {
    /// Create a new reply record.
    pub fn new(thread_id: i64, user_id: i64, body: impl Into<String>) -> Self {
        Self {
            thread_id,
            user_id,
            body: body.into(),
        }
    }
}

/// Repository for reply persistence operations.
pub struct ReplyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new reply in the database.
    ///
    /// Returns the created reply with the assigned ID.
    pub async fn create(&self, new_reply: &NewReply) -> Result<Reply> {
        let result =
            sqlx::query("INSERT INTO replies (thread_id, user_id, body) VALUES (?, ?, ?)")
                .bind(new_reply.thread_id)
                .bind(new_reply.user_id)
                .bind(&new_reply.body)
                .execute(self.pool)
                .await
                .map_err(|e| ForumError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        let reply = sqlx::query_as::<_, Reply>(
            "SELECT id, thread_id, user_id, body, created_at FROM replies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        reply.ok_or_else(|| ForumError::NotFound("reply".to_string()))
    }

    /// List all replies in a thread, oldest first, with author usernames.
    pub async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<ReplyView>> {
        let replies = sqlx::query_as::<_, ReplyView>(
            "SELECT r.id, r.thread_id, r.user_id, r.body, r.created_at, u.username
             FROM replies r
             JOIN users u ON r.user_id = u.id
             WHERE r.thread_id = ?
             ORDER BY r.created_at ASC, r.id ASC",
        )
        .bind(thread_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(replies)
    }

    /// List replies in a thread, oldest first, with pagination.
    pub async fn list_by_thread_page(
        &self,
        thread_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReplyView>> {
        let replies = sqlx::query_as::<_, ReplyView>(
            "SELECT r.id, r.thread_id, r.user_id, r.body, r.created_at, u.username
             FROM replies r
             JOIN users u ON r.user_id = u.id
             WHERE r.thread_id = ?
             ORDER BY r.created_at ASC, r.id ASC
             LIMIT ? OFFSET ?",
        )
        .bind(thread_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ForumError::Database(e.to_string()))?;

        Ok(replies)
    }

    /// Count replies in a thread.
    pub async fn count_by_thread(&self, thread_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM replies WHERE thread_id = ?")
            .bind(thread_id)
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
    use crate::forum::{NewThread, ThreadRepository};
    use crate::Database;

    async fn setup_thread() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("alice", "hash"))
            .await
            .unwrap();
        let thread = ThreadRepository::new(db.pool())
            .create(&NewThread::new(user.id, 1, "Test Thread", "Body text here"))
            .await
            .unwrap();
        (db, user.id, thread.id)
    }

    #[tokio::test]
    async fn test_create_reply() {
        let (db, user_id, thread_id) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        let reply = repo
            .create(&NewReply::new(thread_id, user_id, "A reply of some length"))
            .await
            .unwrap();

        assert_eq!(reply.thread_id, thread_id);
        assert_eq!(reply.user_id, user_id);
        assert_eq!(reply.body, "A reply of some length");
    }

    #[tokio::test]
    async fn test_create_reply_missing_thread() {
        let (db, user_id, _) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        let result = repo
            .create(&NewReply::new(999, user_id, "A reply of some length"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_by_thread_oldest_first() {
        let (db, user_id, thread_id) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        for i in 1..=3 {
            repo.create(&NewReply::new(thread_id, user_id, format!("Reply number {i}")))
                .await
                .unwrap();
        }

        let replies = repo.list_by_thread(thread_id).await.unwrap();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].body, "Reply number 1");
        assert_eq!(replies[1].body, "Reply number 2");
        assert_eq!(replies[2].body, "Reply number 3");
        assert_eq!(replies[0].username, "alice");
    }

    #[tokio::test]
    async fn test_list_by_thread_page() {
        let (db, user_id, thread_id) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        for i in 1..=5 {
            repo.create(&NewReply::new(thread_id, user_id, format!("Reply number {i}")))
                .await
                .unwrap();
        }

        let page = repo.list_by_thread_page(thread_id, 2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].body, "Reply number 3");
        assert_eq!(page[1].body, "Reply number 4");
    }

    #[tokio::test]
    async fn test_count_by_thread() {
        let (db, user_id, thread_id) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        assert_eq!(repo.count_by_thread(thread_id).await.unwrap(), 0);

        repo.create(&NewReply::new(thread_id, user_id, "A reply of some length"))
            .await
            .unwrap();

        assert_eq!(repo.count_by_thread(thread_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replies_deleted_with_thread() {
        let (db, user_id, thread_id) = setup_thread().await;
        let repo = ReplyRepository::new(db.pool());

        repo.create(&NewReply::new(thread_id, user_id, "A reply of some length"))
            .await
            .unwrap();

        sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(thread_id)
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(repo.count_by_thread(thread_id).await.unwrap(), 0);
    }
}
