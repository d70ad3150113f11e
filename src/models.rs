use serde::Deserialize;

use crate::entities::{movie, user};

/// Director recorded for movies created from a lookup result.
pub const UNKNOWN_DIRECTOR: &str = "Unknown";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub user_id: i32,
}

#[derive(Clone, Debug)]
pub struct NewMovie {
    pub name: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub user_id: i32,
}

impl NewMovie {
    /// Builds a movie owned by `user_id` from a successful lookup.
    pub fn from_metadata(user_id: i32, meta: MovieMetadata) -> Self {
        Self {
            name: meta.title,
            director: UNKNOWN_DIRECTOR.to_string(),
            year: meta.year,
            rating: meta.rating,
            poster: meta.poster,
            user_id,
        }
    }
}

/// Fields overwritten by an update. Poster and owner are never touched.
#[derive(Clone, Debug)]
pub struct MovieUpdate {
    pub id: i32,
    pub name: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
}

/// Normalized lookup result from the metadata provider.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self { id: model.id, name: model.name }
    }
}

impl From<movie::Model> for Movie {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            director: model.director,
            year: model.year,
            rating: model.rating,
            poster: model.poster,
            user_id: model.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieForm {
    pub title: String,
}

/// Raw update form. Numbers arrive as text so a bad value becomes a form
/// error instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateMovieForm {
    pub name: String,
    pub director: String,
    pub year: String,
    pub rating: String,
}

impl UpdateMovieForm {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            name: movie.name.clone(),
            director: movie.director.clone(),
            year: movie.year.to_string(),
            rating: movie.rating.to_string(),
        }
    }

    pub fn to_update(&self, id: i32) -> Option<MovieUpdate> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(MovieUpdate {
            id,
            name: name.to_string(),
            director: self.director.trim().to_string(),
            year: self.year.trim().parse().ok()?,
            rating: self.rating.trim().parse().ok().filter(|r: &f64| r.is_finite())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, year: &str, rating: &str) -> UpdateMovieForm {
        UpdateMovieForm {
            name: name.to_string(),
            director: " Joseph Kosinski ".to_string(),
            year: year.to_string(),
            rating: rating.to_string(),
        }
    }

    #[test]
    fn update_form_parses_numbers_and_trims_text() {
        let update = form(" Top Gun: Maverick ", "2022", " 7.8").to_update(4).unwrap();
        assert_eq!(update.id, 4);
        assert_eq!(update.name, "Top Gun: Maverick");
        assert_eq!(update.director, "Joseph Kosinski");
        assert_eq!(update.year, 2022);
        assert_eq!(update.rating, 7.8);
    }

    #[test]
    fn update_form_rejects_bad_input() {
        assert!(form("Top Gun", "twenty", "7.8").to_update(1).is_none());
        assert!(form("Top Gun", "2022", "great").to_update(1).is_none());
        assert!(form("Top Gun", "2022", "NaN").to_update(1).is_none());
        assert!(form("   ", "2022", "7.8").to_update(1).is_none());
    }

    #[test]
    fn lookup_result_becomes_movie_with_unknown_director() {
        let meta = MovieMetadata {
            title: "Top Gun".to_string(),
            year: 1986,
            rating: 6.9,
            poster: Some("https://example.com/topgun.jpg".to_string()),
        };
        let movie = NewMovie::from_metadata(3, meta);
        assert_eq!(movie.director, UNKNOWN_DIRECTOR);
        assert_eq!(movie.user_id, 3);
        assert_eq!(movie.year, 1986);
        assert_eq!(movie.poster.as_deref(), Some("https://example.com/topgun.jpg"));
    }
}
