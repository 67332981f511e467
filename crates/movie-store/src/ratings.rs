//! Rating facts with reverse indices by movie and by user.
//!
//! ## Indices
//! - `facts`: packed (user, movie) key -> [`RatingFact`]
//! - `by_movie`: MovieId -> user ids that rated it
//! - `by_user`: UserId -> movie ids the user rated
//!
//! The reverse indices store the *other* half of the pair rather than a copy
//! of the fact, so `set` only has to overwrite the fact in one place.
//!
//! ## Composite key
//! `(user << 20) XOR (movie & 0xFFFFF)` packs a pair into one `i64`. It is
//! only injective while movie ids fit in 20 bits, so each fact also keeps its
//! own ids and every lookup checks them: a different pair that lands on the
//! same key is treated as absent instead of aliasing the stored fact.
//!
//! ## Removal
//! `remove` excises the pair from both reverse indices (swap-remove), so an
//! owner's count is always the number of its live facts. Owners whose count
//! drops to zero stay in the index and rank with a count of zero.

use crate::config::StoreConfig;
use crate::movies::MovieStore;
use crate::types::{MovieId, RatingFact, UserId};
use structures::{rank_sort, GrowableSequence, HashTable};
use tracing::{debug, instrument, warn};

/// Packed (user, movie) key
pub type RatingKey = i64;

/// Bits reserved for the movie id in a [`RatingKey`]
const MOVIE_BITS: u32 = 20;
const MOVIE_MASK: i32 = 0xFFFFF;

/// Packs a (user, movie) pair into a single key
pub fn rating_key(user_id: UserId, movie_id: MovieId) -> RatingKey {
    ((user_id as i64) << MOVIE_BITS) ^ ((movie_id & MOVIE_MASK) as i64)
}

/// Owner id -> ids linked to it, e.g. movie -> users who rated it
#[derive(Debug, Clone)]
struct ReverseIndex {
    owners: HashTable<i32, GrowableSequence<i32>>,
}

impl ReverseIndex {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            owners: HashTable::with_capacity(capacity),
        }
    }

    fn link(&mut self, owner: i32, other: i32) {
        match self.owners.get_mut(&owner) {
            Some(linked) => linked.append(other),
            None => {
                let mut linked = GrowableSequence::new();
                linked.append(other);
                self.owners.put(owner, linked);
            }
        }
    }

    fn unlink(&mut self, owner: i32, other: i32) -> bool {
        let Some(linked) = self.owners.get_mut(&owner) else {
            return false;
        };
        match linked.position(&other) {
            Some(index) => linked.swap_remove(index).is_ok(),
            None => false,
        }
    }

    fn linked(&self, owner: i32) -> &[i32] {
        self.owners
            .get(&owner)
            .map(|linked| linked.as_slice())
            .unwrap_or(&[])
    }

    fn count(&self, owner: i32) -> Option<usize> {
        self.owners.get(&owner).map(|linked| linked.len())
    }

    fn owner_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.owners.keys().copied()
    }

    /// Owner ids ranked by count descending, ties by id ascending
    fn most_linked(&self, limit: usize) -> Vec<i32> {
        let mut counts: Vec<(i32, usize)> = self
            .owners
            .iter()
            .map(|(owner, linked)| (*owner, linked.len()))
            .collect();

        rank_sort(&mut counts, |a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.into_iter().take(limit).map(|(owner, _)| owner).collect()
    }
}

/// Owns every rating fact and both reverse indices
#[derive(Debug, Clone)]
pub struct RatingStore {
    facts: HashTable<RatingKey, RatingFact>,
    by_movie: ReverseIndex,
    by_user: ReverseIndex,
}

impl RatingStore {
    /// Creates an empty store sized by `StoreConfig::default()`
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            facts: HashTable::with_capacity(config.rating_capacity),
            by_movie: ReverseIndex::with_capacity(config.rating_owner_capacity),
            by_user: ReverseIndex::with_capacity(config.rating_owner_capacity),
        }
    }

    /// The fact for this exact pair, if one is stored
    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<&RatingFact> {
        self.facts
            .get(&rating_key(user_id, movie_id))
            .filter(|fact| fact.user_id == user_id && fact.movie_id == movie_id)
    }

    /// Adds a rating.
    ///
    /// Returns `false` without touching any index if the pair already has a
    /// fact, or if its packed key is taken by a different pair.
    pub fn add(&mut self, user_id: UserId, movie_id: MovieId, rating: f32, timestamp: i64) -> bool {
        let key = rating_key(user_id, movie_id);

        if let Some(existing) = self.facts.get(&key) {
            if existing.user_id == user_id && existing.movie_id == movie_id {
                debug!(user_id, movie_id, "rejected duplicate rating");
            } else {
                warn!(
                    user_id,
                    movie_id,
                    existing_user = existing.user_id,
                    existing_movie = existing.movie_id,
                    "rating key collision"
                );
            }
            return false;
        }

        self.facts.put(
            key,
            RatingFact {
                user_id,
                movie_id,
                rating,
                timestamp,
            },
        );
        self.by_movie.link(movie_id, user_id);
        self.by_user.link(user_id, movie_id);
        true
    }

    /// Removes the rating for this pair from the fact table and both reverse
    /// indices. Returns `false` if there is none.
    pub fn remove(&mut self, user_id: UserId, movie_id: MovieId) -> bool {
        if self.get(user_id, movie_id).is_none() {
            return false;
        }

        self.facts.remove(&rating_key(user_id, movie_id));
        self.by_movie.unlink(movie_id, user_id);
        self.by_user.unlink(user_id, movie_id);
        true
    }

    /// Overwrites rating and timestamp if the pair is already rated,
    /// otherwise behaves exactly like [`RatingStore::add`]
    pub fn set(&mut self, user_id: UserId, movie_id: MovieId, rating: f32, timestamp: i64) -> bool {
        if let Some(fact) = self.facts.get_mut(&rating_key(user_id, movie_id)) {
            if fact.user_id == user_id && fact.movie_id == movie_id {
                fact.rating = rating;
                fact.timestamp = timestamp;
                return true;
            }
        }
        self.add(user_id, movie_id, rating, timestamp)
    }

    /// Rating values of every live fact for the movie; empty if unknown
    pub fn movie_ratings(&self, movie_id: MovieId) -> Vec<f32> {
        self.by_movie
            .linked(movie_id)
            .iter()
            .filter_map(|&user_id| self.get(user_id, movie_id))
            .map(|fact| fact.rating)
            .collect()
    }

    /// Rating values of every live fact by the user; empty if unknown
    pub fn user_ratings(&self, user_id: UserId) -> Vec<f32> {
        self.by_user
            .linked(user_id)
            .iter()
            .filter_map(|&movie_id| self.get(user_id, movie_id))
            .map(|fact| fact.rating)
            .collect()
    }

    /// Mean rating of the movie.
    ///
    /// - `0.0` if the movie exists in `movies` but has no ratings
    /// - `-1.0` if the movie is unknown to both stores
    pub fn movie_average_rating(&self, movies: &MovieStore, movie_id: MovieId) -> f32 {
        match mean(&self.movie_ratings(movie_id)) {
            Some(average) => average,
            None if movies.title(movie_id).is_some() => 0.0,
            None => -1.0,
        }
    }

    /// Mean rating given by the user, or `-1.0` if they have none
    pub fn user_average_rating(&self, user_id: UserId) -> f32 {
        mean(&self.user_ratings(user_id)).unwrap_or(-1.0)
    }

    /// Number of ratings of the movie.
    ///
    /// - `0` if the movie exists in `movies` but has no ratings
    /// - `-1` if the movie is unknown to both stores
    pub fn num_ratings(&self, movies: &MovieStore, movie_id: MovieId) -> i32 {
        match self.by_movie.count(movie_id) {
            Some(count) if count > 0 => count as i32,
            _ if movies.title(movie_id).is_some() => 0,
            _ => -1,
        }
    }

    /// Up to `limit` movie ids with the most ratings, most first.
    /// Ties go to the lower id.
    #[instrument(skip(self))]
    pub fn most_rated_movies(&self, limit: usize) -> Vec<MovieId> {
        self.by_movie.most_linked(limit)
    }

    /// Up to `limit` user ids with the most ratings, most first.
    /// Ties go to the lower id.
    #[instrument(skip(self))]
    pub fn most_rated_users(&self, limit: usize) -> Vec<UserId> {
        self.by_user.most_linked(limit)
    }

    /// Up to `limit` rated movie ids with the highest average rating,
    /// highest first. Ties go to the lower id.
    #[instrument(skip(self, movies))]
    pub fn top_average_rated_movies(&self, movies: &MovieStore, limit: usize) -> Vec<MovieId> {
        let mut averages: Vec<(MovieId, f32)> = self
            .by_movie
            .owner_ids()
            .map(|movie_id| (movie_id, self.movie_average_rating(movies, movie_id)))
            .collect();

        rank_sort(&mut averages, |a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        averages.into_iter().take(limit).map(|(id, _)| id).collect()
    }

    /// Number of live rating facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Default for RatingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let total: f32 = values.iter().sum();
    Some(total / values.len() as f32)
}
