//! # Movie Store Crate
//!
//! In-memory stores for a TMDB-style movie dataset, built on the hash table
//! and sequence from the `structures` crate.
//!
//! ## Main Components
//!
//! - **movies**: [`MovieStore`], movie records plus the collections they belong to
//! - **ratings**: [`RatingStore`], one rating per (user, movie) with per-movie
//!   and per-user reverse indices
//! - **credits**: [`CreditStore`], cast and crew per movie with deduplicated people
//! - **parser** / **loader**: read a dataset directory into [`Stores`]
//! - **config**: initial table sizes
//! - **error**: error types for data loading
//!
//! ## Example Usage
//!
//! ```no_run
//! use movie_store::{StoreConfig, Stores};
//! use std::path::Path;
//!
//! let stores = Stores::load_from_files(Path::new("data/tmdb"), &StoreConfig::default())?;
//!
//! let title = stores.movies.title(862).unwrap_or("<unknown>");
//! let average = stores.ratings.movie_average_rating(&stores.movies, 862);
//! let count = stores.ratings.num_ratings(&stores.movies, 862);
//! println!("{title}: {average:.2} from {count} ratings");
//! # Ok::<(), movie_store::DataLoadError>(())
//! ```
//!
//! The three stores are independent. Queries that need to tell an unknown
//! movie from an unrated one take the [`MovieStore`] as an argument.

pub mod config;
pub mod credits;
pub mod error;
pub mod loader;
pub mod movies;
pub mod parser;
pub mod ratings;
pub mod types;

pub use config::StoreConfig;
pub use credits::CreditStore;
pub use error::{DataLoadError, Result};
pub use loader::LoadSummary;
pub use movies::MovieStore;
pub use ratings::RatingStore;
pub use types::{
    // Type aliases
    CollectionId,
    MovieId,
    PersonId,
    UserId,
    // Records
    CastCredit,
    Collection,
    Company,
    CrewCredit,
    Genre,
    Movie,
    MovieDetails,
    Person,
    RatingFact,
    // Traits
    Credit,
};

/// The three stores of one dataset
#[derive(Debug, Clone)]
pub struct Stores {
    pub movies: MovieStore,
    pub ratings: RatingStore,
    pub credits: CreditStore,
}

impl Stores {
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            movies: MovieStore::with_config(config),
            ratings: RatingStore::with_config(config),
            credits: CreditStore::with_config(config),
        }
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::new()
    }
}
