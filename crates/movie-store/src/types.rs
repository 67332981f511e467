//! Core domain types for the movie dataset.
//!
//! Passive records (genres, companies, people, credits, ratings) carry no
//! behavior beyond field access. The two store-owned records, [`Movie`] and
//! [`Collection`], are only mutated through `MovieStore` setters.
//!
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (MovieId, UserId, PersonId)
//! - Derive macros for serde and common traits
//! - `From` conversions between related records
//! - A small trait shared by cast and crew credits

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use structures::GrowableSequence;

// =============================================================================
// Type Aliases
// =============================================================================
// Signed so that `-1` can be returned as the "not found" sentinel

/// Unique identifier for a movie
pub type MovieId = i32;

/// Unique identifier for a user who rates movies
pub type UserId = i32;

/// Unique identifier for a cast or crew member
pub type PersonId = i32;

/// Unique identifier for a collection of movies
pub type CollectionId = i32;

/// Collection id stored on a movie that belongs to no collection
pub const NO_COLLECTION: CollectionId = -1;

// =============================================================================
// Passive Records
// =============================================================================

/// A genre tag attached to a movie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// A production company credited on a movie
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub logo_path: String,
    /// ISO 3166 country code
    pub origin_country: String,
}

/// A deduplicated cast or crew member
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub profile_path: String,
}

/// One acting credit in one movie
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CastCredit {
    pub cast_id: i32,
    pub character: String,
    pub credit_id: String,
    pub gender: i32,
    /// Id of the credited person
    pub id: PersonId,
    pub name: String,
    /// Billing order, 0 is top billed
    pub order: i32,
    pub profile_path: String,
}

/// One crew credit in one movie
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewCredit {
    pub credit_id: String,
    pub department: String,
    pub gender: i32,
    /// Id of the credited person
    pub id: PersonId,
    pub job: String,
    pub name: String,
    pub profile_path: String,
}

/// Behavior shared by cast and crew credits
///
/// Rust concept: a trait lets `CreditStore` link people to films with one
/// generic helper instead of two copies of the same loop.
pub trait Credit {
    /// Id of the credited person
    fn person_id(&self) -> PersonId;

    /// The person record this credit describes
    fn person(&self) -> Person;
}

impl Credit for CastCredit {
    fn person_id(&self) -> PersonId {
        self.id
    }

    fn person(&self) -> Person {
        Person {
            id: self.id,
            name: self.name.clone(),
            profile_path: self.profile_path.clone(),
        }
    }
}

impl Credit for CrewCredit {
    fn person_id(&self) -> PersonId {
        self.id
    }

    fn person(&self) -> Person {
        Person {
            id: self.id,
            name: self.name.clone(),
            profile_path: self.profile_path.clone(),
        }
    }
}

// =============================================================================
// Movie-related Types
// =============================================================================

/// Descriptive fields supplied when a movie is first added
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    pub id: MovieId,
    /// English title
    pub title: String,
    /// Title in the original language
    pub original_title: String,
    pub overview: String,
    /// Empty if the movie has no tagline
    pub tagline: String,
    pub status: String,
    pub genres: Vec<Genre>,
    pub release: NaiveDate,
    /// US dollars
    pub budget: i64,
    /// US dollars
    pub revenue: i64,
    /// ISO 639 codes of the spoken languages
    pub languages: Vec<String>,
    /// ISO 639 code
    pub original_language: String,
    /// Minutes
    pub runtime: f64,
    pub homepage: String,
    pub adult: bool,
    /// Direct-to-video release
    pub video: bool,
    /// Unique part of the poster URL, empty if unknown
    pub poster: String,
}

/// A movie as held by `MovieStore`.
///
/// The descriptive fields never change after `add`. Everything else starts
/// at a default and is updated through the store's setters.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub details: MovieDetails,
    pub vote_average: f64,
    pub vote_count: i32,
    /// Empty until set
    pub imdb_id: String,
    /// 0.0 until set
    pub popularity: f64,
    pub production_companies: GrowableSequence<Company>,
    /// ISO 3166 country codes
    pub production_countries: GrowableSequence<String>,
    /// [`NO_COLLECTION`] unless the movie was added to a collection
    pub collection_id: CollectionId,
}

impl From<MovieDetails> for Movie {
    fn from(details: MovieDetails) -> Self {
        Self {
            details,
            vote_average: 0.0,
            vote_count: 0,
            imdb_id: String::new(),
            popularity: 0.0,
            production_companies: GrowableSequence::new(),
            production_countries: GrowableSequence::new(),
            collection_id: NO_COLLECTION,
        }
    }
}

/// A named group of movies (e.g. a film series)
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub poster_path: String,
    pub backdrop_path: String,
    /// Member movie ids in the order they were added
    pub films: GrowableSequence<MovieId>,
}

impl Collection {
    pub fn new(id: CollectionId, name: &str, poster_path: &str, backdrop_path: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            poster_path: poster_path.to_string(),
            backdrop_path: backdrop_path.to_string(),
            films: GrowableSequence::new(),
        }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a movie
///
/// Rust concept: small, copyable struct (all fields are Copy)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingFact {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.0 to 5.0
    pub rating: f32,
    /// Unix timestamp when the rating was made
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_from_details_defaults() {
        let movie = Movie::from(MovieDetails {
            id: 862,
            title: "Toy Story".to_string(),
            ..Default::default()
        });

        assert_eq!(movie.details.id, 862);
        assert_eq!(movie.collection_id, NO_COLLECTION);
        assert_eq!(movie.popularity, 0.0);
        assert!(movie.imdb_id.is_empty());
        assert!(movie.production_companies.is_empty());
    }

    #[test]
    fn test_credit_person_extraction() {
        let cast = CastCredit {
            id: 31,
            name: "Tom Hanks".to_string(),
            profile_path: "/hanks.jpg".to_string(),
            order: 0,
            ..Default::default()
        };
        let crew = CrewCredit {
            id: 7879,
            name: "John Lasseter".to_string(),
            job: "Director".to_string(),
            ..Default::default()
        };

        assert_eq!(cast.person_id(), 31);
        assert_eq!(cast.person().name, "Tom Hanks");
        assert_eq!(cast.person().profile_path, "/hanks.jpg");
        assert_eq!(crew.person().id, 7879);
    }

    #[test]
    fn test_cast_credit_deserializes_with_missing_fields() {
        let json = r#"{"id": 31, "name": "Tom Hanks", "order": 0}"#;
        let credit: CastCredit = serde_json::from_str(json).unwrap();

        assert_eq!(credit.id, 31);
        assert_eq!(credit.order, 0);
        assert!(credit.character.is_empty());
    }
}
