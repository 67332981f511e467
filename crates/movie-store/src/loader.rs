//! Bulk loading of a dataset directory into [`Stores`].

use crate::Stores;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::parser::{self, CreditsRow, MovieRow};
use crate::types::RatingFact;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// File names expected inside a dataset directory
pub const MOVIES_FILE: &str = "movies.jsonl";
pub const CREDITS_FILE: &str = "credits.jsonl";
pub const RATINGS_FILE: &str = "ratings.dat";

/// Counts of what a load inserted and what it skipped as duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub movies: usize,
    pub credits: usize,
    pub ratings: usize,
    pub skipped: usize,
}

impl Stores {
    /// Load a dataset directory
    ///
    /// Reads `movies.jsonl`, `credits.jsonl` and `ratings.dat` from
    /// `data_dir`, parsing the three files in parallel. Any missing or
    /// malformed file fails the whole load. Rows that repeat an existing
    /// key are skipped with a warning.
    #[instrument(skip(config), fields(dir = %data_dir.display()))]
    pub fn load_from_files(data_dir: &Path, config: &StoreConfig) -> Result<Self> {
        let start = Instant::now();
        let movies_path = data_dir.join(MOVIES_FILE);
        let credits_path = data_dir.join(CREDITS_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        let ((movies, credits), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parser::parse_credits(&credits_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let movies = movies?;
        let credits = credits?;
        let ratings = ratings?;

        debug!(
            movies = movies.len(),
            credits = credits.len(),
            ratings = ratings.len(),
            "parsed dataset files"
        );

        let mut stores = Stores::with_config(config);
        let summary = stores.ingest(movies, credits, ratings);

        info!(
            movies = summary.movies,
            collections = stores.movies.num_collections(),
            credits = summary.credits,
            ratings = summary.ratings,
            skipped = summary.skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dataset loaded"
        );

        Ok(stores)
    }

    /// Insert parsed rows, movies first so collections can attach to them
    pub fn ingest(
        &mut self,
        movies: Vec<MovieRow>,
        credits: Vec<CreditsRow>,
        ratings: Vec<RatingFact>,
    ) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for row in movies {
            if self.insert_movie_row(row) {
                summary.movies += 1;
            } else {
                summary.skipped += 1;
            }
        }

        for row in credits {
            let movie_id = row.id;
            if self.credits.add(row.cast, row.crew, movie_id) {
                summary.credits += 1;
            } else {
                warn!(movie_id, "duplicate credits row skipped");
                summary.skipped += 1;
            }
        }

        for fact in ratings {
            if self
                .ratings
                .add(fact.user_id, fact.movie_id, fact.rating, fact.timestamp)
            {
                summary.ratings += 1;
            } else {
                warn!(
                    user_id = fact.user_id,
                    movie_id = fact.movie_id,
                    "duplicate rating skipped"
                );
                summary.skipped += 1;
            }
        }

        summary
    }

    fn insert_movie_row(&mut self, row: MovieRow) -> bool {
        let id = row.details.id;
        if !self.movies.add(row.details) {
            warn!(movie_id = id, "duplicate movie row skipped");
            return false;
        }

        self.movies.set_vote(id, row.vote_average, row.vote_count);
        self.movies.set_popularity(id, row.popularity);
        if !row.imdb_id.is_empty() {
            self.movies.set_imdb(id, &row.imdb_id);
        }
        for company in row.production_companies {
            self.movies.add_production_company(id, company);
        }
        for country in &row.production_countries {
            self.movies.add_production_country(id, country);
        }
        if let Some(collection) = row.belongs_to_collection {
            self.movies.add_to_collection(
                id,
                collection.id,
                &collection.name,
                &collection.poster_path,
                &collection.backdrop_path,
            );
        }
        true
    }
}
