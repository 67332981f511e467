//! Primary movie index and the collection index built beside it.
//!
//! ## Indices
//! - `movies`: MovieId -> [`Movie`]
//! - `collections`: CollectionId -> [`Collection`], created lazily the first
//!   time a movie is added to a collection and never removed
//!
//! ## Absent movies
//! Every getter answers for a missing id with a fixed sentinel so callers can
//! tell "absent" from "zero" or "empty":
//! - text, list and date fields: `None`
//! - budget, revenue, vote count, collection id: `-1`
//! - runtime, vote average, popularity: `-1.0`
//! - adult, video: `false`
//!
//! Removing a movie tombstones its record only. Collections keep listing it,
//! and the rating and credit stores keep whatever they hold for it.

use crate::config::StoreConfig;
use crate::types::*;
use chrono::NaiveDate;
use structures::HashTable;
use tracing::debug;

/// Owns every movie record and every collection record
#[derive(Debug, Clone)]
pub struct MovieStore {
    movies: HashTable<MovieId, Movie>,
    collections: HashTable<CollectionId, Collection>,
}

impl MovieStore {
    /// Creates an empty store sized by `StoreConfig::default()`
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            movies: HashTable::with_capacity(config.movie_capacity),
            collections: HashTable::with_capacity(config.collection_capacity),
        }
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Adds a movie.
    ///
    /// Returns `false` (and changes nothing) if the id is already stored;
    /// existing records are never updated through `add`.
    pub fn add(&mut self, details: MovieDetails) -> bool {
        let id = details.id;
        if self.movies.contains_key(&id) {
            debug!(movie_id = id, "rejected duplicate movie");
            return false;
        }
        self.movies.put(id, Movie::from(details));
        true
    }

    /// Removes a movie. Does not cascade to collections or other stores.
    pub fn remove(&mut self, id: MovieId) -> bool {
        self.movies.remove(&id)
    }

    /// Borrow the whole record
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.contains_key(&id)
    }

    /// Number of movies stored
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Ids of every stored movie, in table order
    pub fn all_ids(&self) -> Vec<MovieId> {
        self.movies.keys().copied().collect()
    }

    /// Ids of movies released strictly between `start` and `end`.
    ///
    /// A movie released exactly on either date is excluded.
    pub fn all_ids_released_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<MovieId> {
        self.movies
            .iter()
            .filter(|(_, movie)| movie.details.release > start && movie.details.release < end)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Ids of movies whose title, original title or overview contains
    /// `term`, ignoring case. Results come in table order, not by relevance.
    pub fn find_films(&self, term: &str) -> Vec<MovieId> {
        let term = term.to_lowercase();
        self.movies
            .iter()
            .filter(|(_, movie)| {
                let details = &movie.details;
                details.title.to_lowercase().contains(&term)
                    || details.original_title.to_lowercase().contains(&term)
                    || details.overview.to_lowercase().contains(&term)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    // =========================================================================
    // Descriptive fields
    // =========================================================================

    fn details(&self, id: MovieId) -> Option<&MovieDetails> {
        self.movies.get(&id).map(|movie| &movie.details)
    }

    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.title.as_str())
    }

    pub fn original_title(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.original_title.as_str())
    }

    pub fn overview(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.overview.as_str())
    }

    pub fn tagline(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.tagline.as_str())
    }

    pub fn status(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.status.as_str())
    }

    pub fn genres(&self, id: MovieId) -> Option<&[Genre]> {
        self.details(id).map(|d| d.genres.as_slice())
    }

    pub fn release(&self, id: MovieId) -> Option<NaiveDate> {
        self.details(id).map(|d| d.release)
    }

    /// Budget in US dollars, or `-1` if the movie is absent
    pub fn budget(&self, id: MovieId) -> i64 {
        self.details(id).map_or(-1, |d| d.budget)
    }

    /// Revenue in US dollars, or `-1` if the movie is absent
    pub fn revenue(&self, id: MovieId) -> i64 {
        self.details(id).map_or(-1, |d| d.revenue)
    }

    pub fn languages(&self, id: MovieId) -> Option<&[String]> {
        self.details(id).map(|d| d.languages.as_slice())
    }

    pub fn original_language(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.original_language.as_str())
    }

    /// Runtime in minutes, or `-1.0` if the movie is absent
    pub fn runtime(&self, id: MovieId) -> f64 {
        self.details(id).map_or(-1.0, |d| d.runtime)
    }

    pub fn homepage(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.homepage.as_str())
    }

    /// `false` if the movie is absent
    pub fn adult(&self, id: MovieId) -> bool {
        self.details(id).is_some_and(|d| d.adult)
    }

    /// `false` if the movie is absent
    pub fn video(&self, id: MovieId) -> bool {
        self.details(id).is_some_and(|d| d.video)
    }

    pub fn poster(&self, id: MovieId) -> Option<&str> {
        self.details(id).map(|d| d.poster.as_str())
    }

    // =========================================================================
    // Mutable fields
    // =========================================================================

    /// Sets the IMDb vote average and the number of votes behind it
    pub fn set_vote(&mut self, id: MovieId, vote_average: f64, vote_count: i32) -> bool {
        match self.movies.get_mut(&id) {
            Some(movie) => {
                movie.vote_average = vote_average;
                movie.vote_count = vote_count;
                true
            }
            None => false,
        }
    }

    /// `-1.0` if the movie is absent
    pub fn vote_average(&self, id: MovieId) -> f64 {
        self.movies.get(&id).map_or(-1.0, |m| m.vote_average)
    }

    /// `-1` if the movie is absent
    pub fn vote_count(&self, id: MovieId) -> i32 {
        self.movies.get(&id).map_or(-1, |m| m.vote_count)
    }

    pub fn set_imdb(&mut self, id: MovieId, imdb_id: &str) -> bool {
        match self.movies.get_mut(&id) {
            Some(movie) => {
                movie.imdb_id = imdb_id.to_string();
                true
            }
            None => false,
        }
    }

    /// Empty string if never set, `None` if the movie is absent
    pub fn imdb(&self, id: MovieId) -> Option<&str> {
        self.movies.get(&id).map(|m| m.imdb_id.as_str())
    }

    /// Replaces any previous popularity value
    pub fn set_popularity(&mut self, id: MovieId, popularity: f64) -> bool {
        match self.movies.get_mut(&id) {
            Some(movie) => {
                movie.popularity = popularity;
                true
            }
            None => false,
        }
    }

    /// `0.0` if never set, `-1.0` if the movie is absent
    pub fn popularity(&self, id: MovieId) -> f64 {
        self.movies.get(&id).map_or(-1.0, |m| m.popularity)
    }

    pub fn add_production_company(&mut self, id: MovieId, company: Company) -> bool {
        match self.movies.get_mut(&id) {
            Some(movie) => {
                movie.production_companies.append(company);
                true
            }
            None => false,
        }
    }

    /// `country` is an ISO 3166 code
    pub fn add_production_country(&mut self, id: MovieId, country: &str) -> bool {
        match self.movies.get_mut(&id) {
            Some(movie) => {
                movie.production_countries.append(country.to_string());
                true
            }
            None => false,
        }
    }

    pub fn production_companies(&self, id: MovieId) -> Option<Vec<Company>> {
        self.movies
            .get(&id)
            .map(|m| m.production_companies.to_vec())
    }

    pub fn production_countries(&self, id: MovieId) -> Option<Vec<String>> {
        self.movies
            .get(&id)
            .map(|m| m.production_countries.to_vec())
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Puts a film into a collection, creating the collection on first use.
    ///
    /// If the collection already exists its name and paths are kept (the
    /// first writer wins). Adding a film that is already a member does not
    /// list it twice. Returns `false` if the film is unknown.
    pub fn add_to_collection(
        &mut self,
        film_id: MovieId,
        collection_id: CollectionId,
        name: &str,
        poster_path: &str,
        backdrop_path: &str,
    ) -> bool {
        let Some(movie) = self.movies.get_mut(&film_id) else {
            return false;
        };

        if !self.collections.contains_key(&collection_id) {
            debug!(collection_id, name, "creating collection");
            self.collections.put(
                collection_id,
                Collection::new(collection_id, name, poster_path, backdrop_path),
            );
        }

        if let Some(collection) = self.collections.get_mut(&collection_id) {
            if !collection.films.contains(&film_id) {
                collection.films.append(film_id);
            }
        }
        movie.collection_id = collection_id;
        true
    }

    /// Member film ids in insertion order; empty if the collection is unknown
    pub fn films_in_collection(&self, collection_id: CollectionId) -> Vec<MovieId> {
        self.collections
            .get(&collection_id)
            .map(|c| c.films.to_vec())
            .unwrap_or_default()
    }

    pub fn collection_name(&self, collection_id: CollectionId) -> Option<&str> {
        self.collections.get(&collection_id).map(|c| c.name.as_str())
    }

    pub fn collection_poster(&self, collection_id: CollectionId) -> Option<&str> {
        self.collections
            .get(&collection_id)
            .map(|c| c.poster_path.as_str())
    }

    pub fn collection_backdrop(&self, collection_id: CollectionId) -> Option<&str> {
        self.collections
            .get(&collection_id)
            .map(|c| c.backdrop_path.as_str())
    }

    /// The film's collection id: [`NO_COLLECTION`] if it has none, `-1` if
    /// the film is absent
    pub fn collection_id(&self, film_id: MovieId) -> CollectionId {
        self.movies.get(&film_id).map_or(-1, |m| m.collection_id)
    }

    /// Number of collections created so far
    pub fn num_collections(&self) -> usize {
        self.collections.len()
    }
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details(id: MovieId, title: &str, release: NaiveDate) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            original_title: title.to_string(),
            overview: format!("An overview of {}", title),
            release,
            budget: 1_000_000,
            revenue: 5_000_000,
            runtime: 95.0,
            ..Default::default()
        }
    }

    fn create_test_store() -> MovieStore {
        let mut store = MovieStore::new();
        store.add(details(1, "Early Bird", date(2000, 1, 1)));
        store.add(details(2, "Mid Year", date(2000, 6, 15)));
        store.add(details(3, "Late Show", date(2000, 12, 31)));
        store.add(details(4, "Millennium", date(1999, 12, 31)));
        store
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut store = MovieStore::new();

        assert!(store.add(details(1, "Original", date(2001, 1, 1))));
        assert!(!store.add(details(1, "Impostor", date(2002, 2, 2))));

        assert_eq!(store.len(), 1);
        assert_eq!(store.title(1), Some("Original"));
    }

    #[test]
    fn test_absent_sentinels() {
        let store = MovieStore::new();

        assert_eq!(store.title(99), None);
        assert_eq!(store.genres(99), None);
        assert_eq!(store.release(99), None);
        assert_eq!(store.budget(99), -1);
        assert_eq!(store.revenue(99), -1);
        assert_eq!(store.runtime(99), -1.0);
        assert_eq!(store.vote_average(99), -1.0);
        assert_eq!(store.vote_count(99), -1);
        assert_eq!(store.popularity(99), -1.0);
        assert_eq!(store.collection_id(99), -1);
        assert_eq!(store.imdb(99), None);
        assert!(!store.adult(99));
        assert!(!store.video(99));
        assert!(store.production_companies(99).is_none());
    }

    #[test]
    fn test_present_defaults_differ_from_absent() {
        let store = create_test_store();

        assert_eq!(store.popularity(1), 0.0);
        assert_eq!(store.vote_count(1), 0);
        assert_eq!(store.imdb(1), Some(""));
        assert_eq!(store.collection_id(1), NO_COLLECTION);
        assert_eq!(store.production_countries(1), Some(vec![]));
    }

    #[test]
    fn test_remove_then_lookup() {
        let mut store = create_test_store();

        assert!(store.remove(2));
        assert!(!store.remove(2));
        assert_eq!(store.title(2), None);
        assert_eq!(store.len(), 3);
        assert!(!store.all_ids().contains(&2));
    }

    #[test]
    fn test_released_in_range_is_exclusive() {
        let store = create_test_store();

        let ids = store.all_ids_released_in_range(date(2000, 1, 1), date(2000, 12, 31));
        assert_eq!(ids, vec![2]);

        let mut wide = store.all_ids_released_in_range(date(1990, 1, 1), date(2010, 1, 1));
        wide.sort();
        assert_eq!(wide, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_find_films_case_insensitive() {
        let mut store = create_test_store();
        store.add(MovieDetails {
            id: 5,
            title: "Le Voyage".to_string(),
            original_title: "Le Voyage dans la Lune".to_string(),
            overview: "A trip to the MOON".to_string(),
            ..Default::default()
        });

        assert_eq!(store.find_films("MID"), vec![2]);
        assert_eq!(store.find_films("lune"), vec![5]);
        assert_eq!(store.find_films("moon"), vec![5]);
        assert!(store.find_films("nothing matches").is_empty());
    }

    #[test]
    fn test_setters() {
        let mut store = create_test_store();

        assert!(store.set_vote(1, 7.7, 5415));
        assert!(store.set_imdb(1, "tt0114709"));
        assert!(store.set_popularity(1, 21.9));
        assert!(store.set_popularity(1, 22.5));
        assert!(!store.set_vote(99, 1.0, 1));

        assert_eq!(store.vote_average(1), 7.7);
        assert_eq!(store.vote_count(1), 5415);
        assert_eq!(store.imdb(1), Some("tt0114709"));
        assert_eq!(store.popularity(1), 22.5);
    }

    #[test]
    fn test_production_details() {
        let mut store = create_test_store();
        let pixar = Company {
            id: 3,
            name: "Pixar Animation Studios".to_string(),
            ..Default::default()
        };

        assert!(store.add_production_company(1, pixar.clone()));
        assert!(store.add_production_country(1, "US"));
        assert!(store.add_production_country(1, "GB"));
        assert!(!store.add_production_country(99, "FR"));

        assert_eq!(store.production_companies(1), Some(vec![pixar]));
        assert_eq!(
            store.production_countries(1),
            Some(vec!["US".to_string(), "GB".to_string()])
        );
    }

    #[test]
    fn test_collections() {
        let mut store = create_test_store();

        assert!(store.add_to_collection(1, 10, "Trilogy", "/poster.jpg", "/back.jpg"));
        assert!(store.add_to_collection(2, 10, "Renamed", "/other.jpg", "/other.jpg"));
        assert!(!store.add_to_collection(99, 10, "Trilogy", "", ""));

        assert_eq!(store.films_in_collection(10), vec![1, 2]);
        assert_eq!(store.collection_name(10), Some("Trilogy"));
        assert_eq!(store.collection_poster(10), Some("/poster.jpg"));
        assert_eq!(store.collection_backdrop(10), Some("/back.jpg"));
        assert_eq!(store.collection_id(1), 10);
        assert_eq!(store.collection_id(3), NO_COLLECTION);

        assert!(store.films_in_collection(11).is_empty());
        assert_eq!(store.collection_name(11), None);
        assert_eq!(store.num_collections(), 1);
    }

    #[test]
    fn test_add_to_collection_twice_lists_film_once() {
        let mut store = create_test_store();

        assert!(store.add_to_collection(1, 10, "Trilogy", "", ""));
        assert!(store.add_to_collection(1, 10, "Trilogy", "", ""));

        assert_eq!(store.films_in_collection(10), vec![1]);
    }
}
