//! Comment service.
//!
//! Creating a comment also refreshes the film's `comment_count` and average
//! `rating`. Both writes happen in one PostgreSQL transaction so the counters
//! never drift from the comment table.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::comment::{Comment, DEFAULT_COMMENT_COUNT, NewComment},
};

#[derive(Debug, Clone)]
pub struct CommentService {
    pool: DbPool,
}

impl CommentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a comment and update the film's counters.
    ///
    /// The caller checks that the film exists; a film deleted in between
    /// surfaces as a foreign key `Database` error.
    pub async fn create(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut tx = self.pool.begin().await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, text, rating, film_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&comment.text)
        .bind(comment.rating)
        .bind(comment.film_id)
        .bind(comment.user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE films SET
                comment_count = stats.count,
                rating = stats.average,
                updated_at = NOW()
            FROM (
                SELECT COUNT(*)::INTEGER AS count,
                       COALESCE(AVG(rating), 0)::DOUBLE PRECISION AS average
                FROM comments
                WHERE film_id = $1
            ) AS stats
            WHERE films.id = $1
            "#,
        )
        .bind(comment.film_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("New comment {} for film {}", comment.id, comment.film_id);

        Ok(comment)
    }

    /// Latest comments of a film, newest first.
    pub async fn find_by_film_id(&self, film_id: Uuid) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE film_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(film_id)
        .bind(DEFAULT_COMMENT_COUNT)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Remove every comment of a film. Returns the number deleted.
    pub async fn delete_by_film_id(&self, film_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE film_id = $1")
            .bind(film_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
