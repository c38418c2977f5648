//! Movie records and the create/update form

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type MovieId = u64;

/// Earliest year a film can have
pub const MIN_YEAR: i32 = 1888;

/// Placeholder stored when no genre is given
pub const NO_GENRE: &str = "Sin género";

/// Placeholder stored when no description is given
pub const NO_DESCRIPTION: &str = "Sin descripción";

fn default_public() -> bool {
    true
}

/// A movie as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    /// The admin listing sends `año`, the public one `anio`
    #[serde(rename = "año", alias = "anio", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(rename = "genero", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "esPublica", default = "default_public")]
    pub is_public: bool,
}

/// Why a form was refused before sending it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Título y director son obligatorios")]
    MissingTitleOrDirector,

    #[error("El año debe ser mayor o igual a 1888")]
    YearTooEarly(i32),
}

/// Body of the create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieForm {
    #[serde(rename = "titulo")]
    pub title: String,

    pub director: String,

    #[serde(rename = "año")]
    pub year: i32,

    #[serde(rename = "genero")]
    pub genre: String,

    #[serde(rename = "descripcion")]
    pub description: String,

    #[serde(rename = "esPublica")]
    pub is_public: bool,
}

impl Default for MovieForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            director: String::new(),
            year: chrono::Local::now().year(),
            genre: NO_GENRE.to_string(),
            description: NO_DESCRIPTION.to_string(),
            is_public: true,
        }
    }
}

impl MovieForm {
    pub fn new(title: &str, director: &str, year: i32) -> Self {
        Self {
            title: title.to_string(),
            director: director.to_string(),
            year,
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: &str) -> Self {
        self.genre = genre.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_public(mut self, value: bool) -> Self {
        self.is_public = value;
        self
    }

    /// Pre-fill the form to edit `movie`
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            director: movie.director.clone().unwrap_or_default(),
            year: movie.year.unwrap_or_else(|| chrono::Local::now().year()),
            genre: non_empty_or(movie.genre.as_deref(), NO_GENRE),
            description: non_empty_or(movie.description.as_deref(), NO_DESCRIPTION),
            is_public: movie.is_public,
        }
    }

    /// Checks run before any request is dispatched
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() || self.director.trim().is_empty() {
            return Err(ValidationError::MissingTitleOrDirector);
        }
        if self.year < MIN_YEAR {
            return Err(ValidationError::YearTooEarly(self.year));
        }
        Ok(())
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
