//! Initial sizing for the stores' hash tables.
//!
//! Tables grow on their own, so these values only trade memory for fewer
//! rehashes during a bulk load.

use serde::{Deserialize, Serialize};

/// Initial hash table capacities for every index in [`crate::Stores`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Movie records
    pub movie_capacity: usize,
    /// Collection records
    pub collection_capacity: usize,
    /// Rating facts keyed by (user, movie)
    pub rating_capacity: usize,
    /// Reverse-index owners (movies or users with ratings)
    pub rating_owner_capacity: usize,
    /// Movies with cast/crew credits
    pub credit_capacity: usize,
    /// Deduplicated people, per directory
    pub person_capacity: usize,
}

impl StoreConfig {
    pub fn with_movie_capacity(mut self, capacity: usize) -> Self {
        self.movie_capacity = capacity;
        self
    }

    pub fn with_collection_capacity(mut self, capacity: usize) -> Self {
        self.collection_capacity = capacity;
        self
    }

    pub fn with_rating_capacity(mut self, capacity: usize) -> Self {
        self.rating_capacity = capacity;
        self
    }

    pub fn with_rating_owner_capacity(mut self, capacity: usize) -> Self {
        self.rating_owner_capacity = capacity;
        self
    }

    pub fn with_credit_capacity(mut self, capacity: usize) -> Self {
        self.credit_capacity = capacity;
        self
    }

    pub fn with_person_capacity(mut self, capacity: usize) -> Self {
        self.person_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    /// Small defaults suited to tests and demos; full dataset loads should
    /// size up through the `with_*` methods or the CLI flags
    fn default() -> Self {
        Self {
            movie_capacity: 1_024,
            collection_capacity: 128,
            rating_capacity: 4_096,
            rating_owner_capacity: 1_024,
            credit_capacity: 1_024,
            person_capacity: 2_048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = StoreConfig::default()
            .with_movie_capacity(50_000)
            .with_rating_capacity(200_000);

        assert_eq!(config.movie_capacity, 50_000);
        assert_eq!(config.rating_capacity, 200_000);
        assert_eq!(config.person_capacity, StoreConfig::default().person_capacity);
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: StoreConfig = serde_json::from_str(r#"{"credit_capacity": 10}"#).unwrap();

        assert_eq!(config.credit_capacity, 10);
        assert_eq!(config.movie_capacity, 1_024);
    }
}
