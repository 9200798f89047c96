//! Watchlist service.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{film::Film, watchlist::WatchlistEntry},
};

#[derive(Debug, Clone)]
pub struct WatchlistService {
    pool: DbPool,
}

impl WatchlistService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, film_id: Uuid) -> Result<WatchlistEntry, AppError> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            INSERT INTO watchlist (id, user_id, film_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(film_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Films on a user's watchlist, most recently added first.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Film>, AppError> {
        let films = sqlx::query_as::<_, Film>(
            r#"
            SELECT f.* FROM films f
            JOIN watchlist w ON w.film_id = f.id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(films)
    }

    pub async fn find_by_user_id_and_film_id(
        &self,
        user_id: Uuid,
        film_id: Uuid,
    ) -> Result<Option<WatchlistEntry>, AppError> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            "SELECT * FROM watchlist WHERE user_id = $1 AND film_id = $2",
        )
        .bind(user_id)
        .bind(film_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Remove a film from every watchlist. Returns the number deleted.
    pub async fn delete(&self, film_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM watchlist WHERE film_id = $1")
            .bind(film_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove a film from one user's watchlist.
    ///
    /// Returns `false` if the film was not on it.
    pub async fn delete_for_user(&self, user_id: Uuid, film_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND film_id = $2")
            .bind(user_id)
            .bind(film_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
