//! Promo film service. The promo table holds at most one row.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{film::Film, watchlist::PromoFilm},
};

#[derive(Debug, Clone)]
pub struct PromoFilmService {
    pool: DbPool,
}

impl PromoFilmService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The currently promoted film, if one is set.
    pub async fn find(&self) -> Result<Option<Film>, AppError> {
        let film = sqlx::query_as::<_, Film>(
            "SELECT f.* FROM films f JOIN promo_films p ON p.film_id = f.id",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(film)
    }

    /// Promote a film, replacing whatever was promoted before.
    pub async fn set(&self, film_id: Uuid) -> Result<PromoFilm, AppError> {
        let promo = sqlx::query_as::<_, PromoFilm>(
            r#"
            INSERT INTO promo_films (slot, film_id)
            VALUES (1, $1)
            ON CONFLICT (slot) DO UPDATE SET film_id = EXCLUDED.film_id, updated_at = NOW()
            RETURNING film_id, updated_at
            "#,
        )
        .bind(film_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Promo film set to {}", promo.film_id);

        Ok(promo)
    }

    /// Clear the promo slot if it points at `film_id`.
    pub async fn delete_by_film_id(&self, film_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM promo_films WHERE film_id = $1")
            .bind(film_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
