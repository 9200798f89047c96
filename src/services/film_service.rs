//! Film service - catalogue CRUD.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::check_user::OwnerLookup,
    models::film::{Film, NewFilm, UpdateFilmRequest},
};

#[derive(Debug, Clone)]
pub struct FilmService {
    pool: DbPool,
}

impl FilmService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, film: NewFilm) -> Result<Film, AppError> {
        let film = sqlx::query_as::<_, Film>(
            r#"
            INSERT INTO films (
                id, title, description, publication_date, genre, released,
                preview_video_link, video_link, starring, director, run_time,
                user_id, poster_image, background_image, background_color
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&film.title)
        .bind(&film.description)
        .bind(film.publication_date)
        .bind(&film.genre)
        .bind(film.released)
        .bind(&film.preview_video_link)
        .bind(&film.video_link)
        .bind(&film.starring)
        .bind(&film.director)
        .bind(film.run_time)
        .bind(film.user_id)
        .bind(&film.poster_image)
        .bind(&film.background_image)
        .bind(&film.background_color)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("New film created: {}", film.title);

        Ok(film)
    }

    pub async fn find_by_id(&self, film_id: Uuid) -> Result<Option<Film>, AppError> {
        let film = sqlx::query_as::<_, Film>("SELECT * FROM films WHERE id = $1")
            .bind(film_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(film)
    }

    /// List films, newest publication first, optionally restricted to a genre.
    pub async fn find(&self, limit: i64, genre: Option<&str>) -> Result<Vec<Film>, AppError> {
        let films = sqlx::query_as::<_, Film>(
            r#"
            SELECT * FROM films
            WHERE ($1::TEXT IS NULL OR genre = $1)
            ORDER BY publication_date DESC
            LIMIT $2
            "#,
        )
        .bind(genre)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(films)
    }

    pub async fn find_by_ids(&self, film_ids: &[Uuid]) -> Result<Vec<Film>, AppError> {
        let films = sqlx::query_as::<_, Film>(
            "SELECT * FROM films WHERE id = ANY($1) ORDER BY publication_date DESC",
        )
        .bind(film_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(films)
    }

    pub async fn exists(&self, film_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM films WHERE id = $1)")
            .bind(film_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Apply a partial update; absent fields keep their current value.
    pub async fn update(
        &self,
        film_id: Uuid,
        update: UpdateFilmRequest,
    ) -> Result<Option<Film>, AppError> {
        let film = sqlx::query_as::<_, Film>(
            r#"
            UPDATE films SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                publication_date = COALESCE($4, publication_date),
                genre = COALESCE($5, genre),
                released = COALESCE($6, released),
                preview_video_link = COALESCE($7, preview_video_link),
                video_link = COALESCE($8, video_link),
                starring = COALESCE($9, starring),
                director = COALESCE($10, director),
                run_time = COALESCE($11, run_time),
                background_color = COALESCE($12, background_color),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(film_id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.publication_date)
        .bind(update.genre)
        .bind(update.released)
        .bind(update.preview_video_link)
        .bind(update.video_link)
        .bind(update.starring)
        .bind(update.director)
        .bind(update.run_time)
        .bind(update.background_color)
        .fetch_optional(&self.pool)
        .await?;

        Ok(film)
    }

    pub async fn set_poster(&self, film_id: Uuid, path: &str) -> Result<Option<Film>, AppError> {
        let film = sqlx::query_as::<_, Film>(
            "UPDATE films SET poster_image = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(path)
        .bind(film_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(film)
    }

    pub async fn set_background(
        &self,
        film_id: Uuid,
        path: &str,
    ) -> Result<Option<Film>, AppError> {
        let film = sqlx::query_as::<_, Film>(
            "UPDATE films SET background_image = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(path)
        .bind(film_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(film)
    }

    /// Delete a film row. Comments, watchlist entries and the promo slot must
    /// be cleared first.
    ///
    /// Returns `false` if the film did not exist.
    pub async fn delete(&self, film_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(film_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl OwnerLookup for FilmService {
    async fn find_owner(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM films WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }
}
