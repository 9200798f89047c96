//! Film data models and API request/response types.
//!
//! This module defines:
//! - `Film`: database entity
//! - `CreateFilmRequest` / `UpdateFilmRequest`: validated request bodies
//! - `FilmResponse` / `FilmListItemResponse`: bodies returned to clients, with
//!   the owning user populated

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::user::UserResponse;

/// Genres a film can be catalogued under.
pub const GENRES: [&str; 9] = [
    "comedy",
    "crime",
    "documentary",
    "drama",
    "horror",
    "family",
    "romance",
    "scifi",
    "thriller",
];

/// Films returned by the list endpoint when no `limit` is given.
pub const DEFAULT_FILM_COUNT: i64 = 60;

/// Represents a film record from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    pub genre: String,
    pub released: i32,

    /// Average of all comment ratings, 0 while the film has no comments
    pub rating: f64,

    pub preview_video_link: String,
    pub video_link: String,
    pub starring: Vec<String>,
    pub director: String,

    /// Running time in minutes
    pub run_time: i32,

    pub comment_count: i32,

    /// Owner of the film; only this user may edit or delete it
    pub user_id: Uuid,

    pub poster_image: Option<String>,
    pub background_image: Option<String>,
    pub background_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_genre(genre: &str) -> Result<(), ValidationError> {
    if GENRES.contains(&genre) {
        Ok(())
    } else {
        let mut error = ValidationError::new("genre");
        error.message = Some(format!("genre must be one of: {}", GENRES.join(", ")).into());
        Err(error)
    }
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or_default();
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("color");
        error.message = Some("background_color must look like #rrggbb".into());
        Err(error)
    }
}

/// Request body for `POST /films`.
///
/// # JSON Example
///
/// ```json
/// {
///   "title": "The Grand Budapest Hotel",
///   "description": "A writer encounters the owner of an aging high-class hotel...",
///   "genre": "comedy",
///   "released": 2014,
///   "preview_video_link": "https://example.com/preview.mp4",
///   "video_link": "https://example.com/film.mp4",
///   "starring": ["Ralph Fiennes", "Tony Revolori"],
///   "director": "Wes Anderson",
///   "run_time": 99,
///   "background_color": "#D8D3BD"
/// }
/// ```
///
/// `publication_date` defaults to now; images are attached later through the
/// upload endpoints but may also be given as paths.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFilmRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 2, max = 100, message = "title must be 2 to 100 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "description is required"),
        length(min = 20, max = 1024, message = "description must be 20 to 1024 characters")
    )]
    pub description: Option<String>,

    pub publication_date: Option<DateTime<Utc>>,

    #[validate(
        required(message = "genre is required"),
        custom(function = "validate_genre")
    )]
    pub genre: Option<String>,

    #[validate(
        required(message = "released is required"),
        range(min = 1895, max = 2100, message = "released must be a valid year")
    )]
    pub released: Option<i32>,

    #[validate(
        required(message = "preview_video_link is required"),
        url(message = "preview_video_link must be a URL")
    )]
    pub preview_video_link: Option<String>,

    #[validate(
        required(message = "video_link is required"),
        url(message = "video_link must be a URL")
    )]
    pub video_link: Option<String>,

    #[validate(
        required(message = "starring is required"),
        length(min = 1, message = "starring must list at least one actor")
    )]
    pub starring: Option<Vec<String>>,

    #[validate(
        required(message = "director is required"),
        length(min = 2, max = 50, message = "director must be 2 to 50 characters")
    )]
    pub director: Option<String>,

    #[validate(
        required(message = "run_time is required"),
        range(min = 1, message = "run_time must be a positive number of minutes")
    )]
    pub run_time: Option<i32>,

    pub poster_image: Option<String>,
    pub background_image: Option<String>,

    #[validate(
        required(message = "background_color is required"),
        custom(function = "validate_color")
    )]
    pub background_color: Option<String>,
}

/// Validated film data ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewFilm {
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    pub genre: String,
    pub released: i32,
    pub preview_video_link: String,
    pub video_link: String,
    pub starring: Vec<String>,
    pub director: String,
    pub run_time: i32,
    pub poster_image: Option<String>,
    pub background_image: Option<String>,
    pub background_color: String,
    pub user_id: Uuid,
}

impl CreateFilmRequest {
    /// Attach the owner. Only call on a request that passed validation.
    pub fn into_new_film(self, user_id: Uuid) -> NewFilm {
        NewFilm {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            publication_date: self.publication_date.unwrap_or_else(Utc::now),
            genre: self.genre.unwrap_or_default(),
            released: self.released.unwrap_or_default(),
            preview_video_link: self.preview_video_link.unwrap_or_default(),
            video_link: self.video_link.unwrap_or_default(),
            starring: self.starring.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            run_time: self.run_time.unwrap_or_default(),
            poster_image: self.poster_image,
            background_image: self.background_image,
            background_color: self.background_color.unwrap_or_default(),
            user_id,
        }
    }
}

/// Request body for `PATCH /films/{film_id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFilmRequest {
    #[validate(length(min = 2, max = 100, message = "title must be 2 to 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 20, max = 1024, message = "description must be 20 to 1024 characters"))]
    pub description: Option<String>,

    pub publication_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_genre"))]
    pub genre: Option<String>,

    #[validate(range(min = 1895, max = 2100, message = "released must be a valid year"))]
    pub released: Option<i32>,

    #[validate(url(message = "preview_video_link must be a URL"))]
    pub preview_video_link: Option<String>,

    #[validate(url(message = "video_link must be a URL"))]
    pub video_link: Option<String>,

    #[validate(length(min = 1, message = "starring must list at least one actor"))]
    pub starring: Option<Vec<String>>,

    #[validate(length(min = 2, max = 50, message = "director must be 2 to 50 characters"))]
    pub director: Option<String>,

    #[validate(range(min = 1, message = "run_time must be a positive number of minutes"))]
    pub run_time: Option<i32>,

    #[validate(custom(function = "validate_color"))]
    pub background_color: Option<String>,
}

/// Query string of `GET /films`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilmQuery {
    pub limit: Option<i64>,
    pub genre: Option<String>,
}

/// Full film view returned by the detail, create and update endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FilmResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    pub genre: String,
    pub released: i32,
    pub rating: f64,
    pub preview_video_link: String,
    pub video_link: String,
    pub starring: Vec<String>,
    pub director: String,
    pub run_time: i32,
    pub comment_count: i32,
    pub user: Option<UserResponse>,
    pub poster_image: Option<String>,
    pub background_image: Option<String>,
    pub background_color: String,
}

impl FilmResponse {
    pub fn new(film: Film, user: Option<UserResponse>) -> Self {
        Self {
            id: film.id,
            title: film.title,
            description: film.description,
            publication_date: film.publication_date,
            genre: film.genre,
            released: film.released,
            rating: film.rating,
            preview_video_link: film.preview_video_link,
            video_link: film.video_link,
            starring: film.starring,
            director: film.director,
            run_time: film.run_time,
            comment_count: film.comment_count,
            user,
            poster_image: film.poster_image,
            background_image: film.background_image,
            background_color: film.background_color,
        }
    }
}

/// Short film card used by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FilmListItemResponse {
    pub id: Uuid,
    pub title: String,
    pub publication_date: DateTime<Utc>,
    pub genre: String,
    pub preview_video_link: String,
    pub poster_image: Option<String>,
    pub comment_count: i32,
    pub user: Option<UserResponse>,
}

impl FilmListItemResponse {
    pub fn new(film: Film, user: Option<UserResponse>) -> Self {
        Self {
            id: film.id,
            title: film.title,
            publication_date: film.publication_date,
            genre: film.genre,
            preview_video_link: film.preview_video_link,
            poster_image: film.poster_image,
            comment_count: film.comment_count,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateFilmRequest {
        CreateFilmRequest {
            title: Some("Moonrise Kingdom".into()),
            description: Some("Two twelve-year-olds fall in love and run away.".into()),
            publication_date: None,
            genre: Some("drama".into()),
            released: Some(2012),
            preview_video_link: Some("https://example.com/preview.mp4".into()),
            video_link: Some("https://example.com/film.mp4".into()),
            starring: Some(vec!["Jared Gilman".into(), "Kara Hayward".into()]),
            director: Some("Wes Anderson".into()),
            run_time: Some(94),
            poster_image: None,
            background_image: None,
            background_color: Some("#E1DD8F".into()),
        }
    }

    #[test]
    fn accepts_complete_film() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_genre_and_bad_color() {
        let request = CreateFilmRequest {
            genre: Some("western".into()),
            background_color: Some("E1DD8F".into()),
            ..valid_request()
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("genre"));
        assert!(fields.contains_key("background_color"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn rejects_empty_cast() {
        let request = CreateFilmRequest {
            starring: Some(Vec::new()),
            ..valid_request()
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("starring"));
    }

    #[test]
    fn partial_update_validates_only_present_fields() {
        let update = UpdateFilmRequest {
            title: Some("Isle of Dogs".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateFilmRequest {
            run_time: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn new_film_defaults_publication_date_and_sets_owner() {
        let owner = Uuid::new_v4();
        let before = Utc::now();

        let film = valid_request().into_new_film(owner);

        assert_eq!(film.user_id, owner);
        assert!(film.publication_date >= before);
        assert_eq!(film.starring.len(), 2);
    }
}
