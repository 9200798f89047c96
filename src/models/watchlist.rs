//! Watchlist and promo film models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One film saved to one user's watchlist.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub film_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request body shared by `POST /watchlist` and `POST /promo`: both only
/// reference a film.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FilmReferenceRequest {
    #[validate(required(message = "film_id is required"))]
    pub film_id: Option<Uuid>,
}

impl FilmReferenceRequest {
    /// Only call on a request that passed validation.
    pub fn film_id(&self) -> Uuid {
        self.film_id.unwrap_or_default()
    }
}

/// The film currently featured on the landing page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromoFilm {
    pub film_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn film_reference_is_required() {
        let request: FilmReferenceRequest = serde_json::from_str("{}").unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("film_id"));
    }
}
