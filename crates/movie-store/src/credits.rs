//! Cast and crew credits per movie, with a deduplicated person directory.
//!
//! ## Indices
//! - `cast` / `crew`: MovieId -> the credit list exactly as it was added
//! - `unique_cast` / `unique_crew`: PersonId -> [`Person`], first sighting wins
//! - `cast_films` / `crew_films`: PersonId -> movie ids, each listed once
//!
//! Removing a movie drops its credit lists but leaves the person directory
//! and the person -> films lists alone; queries that walk a person's films
//! skip movies whose credits are gone.

use crate::config::StoreConfig;
use crate::types::{CastCredit, Credit, CrewCredit, MovieId, Person, PersonId};
use structures::{rank_sort, GrowableSequence, HashTable};
use tracing::{debug, instrument};

/// Highest billing order that still counts as starring in a film.
///
/// Inclusive, so orders 0 through 3 (four positions) qualify.
pub const STAR_BILLING_CUTOFF: i32 = 3;

/// Owns every credit list and both person directories
#[derive(Debug, Clone)]
pub struct CreditStore {
    cast: HashTable<MovieId, Vec<CastCredit>>,
    crew: HashTable<MovieId, Vec<CrewCredit>>,
    cast_films: HashTable<PersonId, GrowableSequence<MovieId>>,
    crew_films: HashTable<PersonId, GrowableSequence<MovieId>>,
    unique_cast: HashTable<PersonId, Person>,
    unique_crew: HashTable<PersonId, Person>,
    film_count: usize,
}

impl CreditStore {
    /// Creates an empty store sized by `StoreConfig::default()`
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            cast: HashTable::with_capacity(config.credit_capacity),
            crew: HashTable::with_capacity(config.credit_capacity),
            cast_films: HashTable::with_capacity(config.person_capacity),
            crew_films: HashTable::with_capacity(config.person_capacity),
            unique_cast: HashTable::with_capacity(config.person_capacity),
            unique_crew: HashTable::with_capacity(config.person_capacity),
            film_count: 0,
        }
    }

    /// Stores the cast and crew of a movie and links every credited person
    /// to it.
    ///
    /// Returns `false` (and changes nothing) if the movie already has
    /// credits.
    pub fn add(&mut self, cast: Vec<CastCredit>, crew: Vec<CrewCredit>, movie_id: MovieId) -> bool {
        if self.cast.contains_key(&movie_id) || self.crew.contains_key(&movie_id) {
            debug!(movie_id, "rejected duplicate credits");
            return false;
        }

        link_people(&cast, movie_id, &mut self.unique_cast, &mut self.cast_films);
        link_people(&crew, movie_id, &mut self.unique_crew, &mut self.crew_films);

        self.cast.put(movie_id, cast);
        self.crew.put(movie_id, crew);
        self.film_count += 1;
        true
    }

    /// Drops both credit lists of a movie.
    ///
    /// Succeeds only if the movie has both lists. People keep the movie in
    /// their film lists.
    pub fn remove(&mut self, movie_id: MovieId) -> bool {
        if !self.cast.contains_key(&movie_id) || !self.crew.contains_key(&movie_id) {
            return false;
        }
        self.cast.remove(&movie_id);
        self.crew.remove(&movie_id);
        self.film_count -= 1;
        true
    }

    /// The movie's cast sorted by billing order; empty if unknown.
    ///
    /// The stored list keeps its insertion order. Equal orders may come back
    /// in any order.
    pub fn film_cast(&self, movie_id: MovieId) -> Vec<CastCredit> {
        let mut cast = self.cast.get(&movie_id).cloned().unwrap_or_default();
        rank_sort(&mut cast, |a, b| a.order.cmp(&b.order));
        cast
    }

    /// The movie's crew sorted by person id; empty if unknown
    pub fn film_crew(&self, movie_id: MovieId) -> Vec<CrewCredit> {
        let mut crew = self.crew.get(&movie_id).cloned().unwrap_or_default();
        rank_sort(&mut crew, |a, b| a.id.cmp(&b.id));
        crew
    }

    /// Number of cast credits, or `-1` if the movie has no credits stored
    pub fn size_of_cast(&self, movie_id: MovieId) -> i32 {
        self.cast.get(&movie_id).map_or(-1, |cast| cast.len() as i32)
    }

    /// Number of crew credits, or `-1` if the movie has no credits stored
    pub fn size_of_crew(&self, movie_id: MovieId) -> i32 {
        self.crew.get(&movie_id).map_or(-1, |crew| crew.len() as i32)
    }

    /// Every distinct cast member ever added, in table order
    pub fn unique_cast(&self) -> Vec<Person> {
        self.unique_cast.values().cloned().collect()
    }

    /// Every distinct crew member ever added, in table order
    pub fn unique_crew(&self) -> Vec<Person> {
        self.unique_crew.values().cloned().collect()
    }

    pub fn cast(&self, person_id: PersonId) -> Option<&Person> {
        self.unique_cast.get(&person_id)
    }

    pub fn crew(&self, person_id: PersonId) -> Option<&Person> {
        self.unique_crew.get(&person_id)
    }

    /// Cast members whose name contains `name`, ignoring case
    pub fn find_cast(&self, name: &str) -> Vec<Person> {
        find_by_name(&self.unique_cast, name)
    }

    /// Crew members whose name contains `name`, ignoring case
    pub fn find_crew(&self, name: &str) -> Vec<Person> {
        find_by_name(&self.unique_crew, name)
    }

    /// Movies the person acted in; empty if unknown
    pub fn cast_films(&self, person_id: PersonId) -> Vec<MovieId> {
        self.cast_films
            .get(&person_id)
            .map(|films| films.to_vec())
            .unwrap_or_default()
    }

    /// Movies the person crewed on; empty if unknown
    pub fn crew_films(&self, person_id: PersonId) -> Vec<MovieId> {
        self.crew_films
            .get(&person_id)
            .map(|films| films.to_vec())
            .unwrap_or_default()
    }

    /// Movies where the person is billed at order [`STAR_BILLING_CUTOFF`]
    /// or better
    pub fn cast_stars_in_films(&self, person_id: PersonId) -> Vec<MovieId> {
        let Some(films) = self.cast_films.get(&person_id) else {
            return Vec::new();
        };

        films
            .iter()
            .copied()
            .filter(|movie_id| {
                self.cast.get(movie_id).is_some_and(|cast| {
                    cast.iter().any(|credit| {
                        credit.id == person_id && credit.order <= STAR_BILLING_CUTOFF
                    })
                })
            })
            .collect()
    }

    /// Total cast credits of the person across all stored movies, counting
    /// every role separately. `-1` if the person was never in a cast.
    pub fn num_cast_credits(&self, person_id: PersonId) -> i32 {
        if !self.unique_cast.contains_key(&person_id) {
            return -1;
        }
        let Some(films) = self.cast_films.get(&person_id) else {
            return 0;
        };

        films
            .iter()
            .filter_map(|movie_id| self.cast.get(movie_id))
            .map(|cast| cast.iter().filter(|credit| credit.id == person_id).count() as i32)
            .sum()
    }

    /// Up to `limit` cast members with the most credits, most first.
    /// Ties go to the lower person id.
    #[instrument(skip(self))]
    pub fn most_cast_credits(&self, limit: usize) -> Vec<Person> {
        let mut counts: Vec<(PersonId, i32)> = self
            .unique_cast
            .keys()
            .map(|&person_id| (person_id, self.num_cast_credits(person_id)))
            .collect();

        rank_sort(&mut counts, |a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
            .into_iter()
            .take(limit)
            .filter_map(|(person_id, _)| self.unique_cast.get(&person_id).cloned())
            .collect()
    }

    /// Number of movies with credits stored
    pub fn len(&self) -> usize {
        self.film_count
    }

    pub fn is_empty(&self) -> bool {
        self.film_count == 0
    }
}

impl Default for CreditStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers each credited person once and lists the movie under them once
fn link_people<C: Credit>(
    credits: &[C],
    movie_id: MovieId,
    directory: &mut HashTable<PersonId, Person>,
    films: &mut HashTable<PersonId, GrowableSequence<MovieId>>,
) {
    for credit in credits {
        let person_id = credit.person_id();
        if !directory.contains_key(&person_id) {
            directory.put(person_id, credit.person());
        }

        match films.get_mut(&person_id) {
            Some(listed) => {
                if !listed.contains(&movie_id) {
                    listed.append(movie_id);
                }
            }
            None => {
                let mut listed = GrowableSequence::new();
                listed.append(movie_id);
                films.put(person_id, listed);
            }
        }
    }
}

fn find_by_name(directory: &HashTable<PersonId, Person>, name: &str) -> Vec<Person> {
    let name = name.to_lowercase();
    directory
        .values()
        .filter(|person| person.name.to_lowercase().contains(&name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: PersonId, name: &str, order: i32) -> CastCredit {
        CastCredit {
            id,
            name: name.to_string(),
            order,
            ..Default::default()
        }
    }

    fn crew_member(id: PersonId, name: &str, job: &str) -> CrewCredit {
        CrewCredit {
            id,
            name: name.to_string(),
            job: job.to_string(),
            ..Default::default()
        }
    }

    fn create_test_store() -> CreditStore {
        let mut store = CreditStore::new();
        store.add(
            vec![
                actor(31, "Tom Hanks", 0),
                actor(12898, "Tim Allen", 1),
                actor(7167, "Don Rickles", 2),
            ],
            vec![
                crew_member(7879, "John Lasseter", "Director"),
                crew_member(12891, "Joss Whedon", "Screenplay"),
            ],
            862,
        );
        store.add(
            vec![
                actor(12898, "Tim Allen", 0),
                actor(31, "Tom Hanks", 4),
                actor(31, "Tom Hanks", 7),
            ],
            vec![crew_member(7879, "John Lasseter", "Producer")],
            863,
        );
        store
    }

    #[test]
    fn test_add_rejects_duplicate_movie() {
        let mut store = create_test_store();

        assert!(!store.add(vec![actor(31, "Tom Hanks", 0)], vec![], 862));

        assert_eq!(store.size_of_cast(862), 3);
        assert_eq!(store.num_cast_credits(31), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_film_cast_sorted_by_order() {
        let mut store = CreditStore::new();
        store.add(
            vec![actor(3, "C", 2), actor(1, "A", 0), actor(2, "B", 1)],
            vec![],
            1,
        );

        let orders: Vec<i32> = store.film_cast(1).iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        // Repeated calls give the same answer
        assert_eq!(store.film_cast(1), store.film_cast(1));
        assert!(store.film_cast(99).is_empty());
    }

    #[test]
    fn test_film_crew_sorted_by_person_id() {
        let store = create_test_store();

        let ids: Vec<PersonId> = store.film_crew(862).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7879, 12891]);
    }

    #[test]
    fn test_sizes() {
        let store = create_test_store();

        assert_eq!(store.size_of_cast(863), 3);
        assert_eq!(store.size_of_crew(863), 1);
        assert_eq!(store.size_of_cast(1), -1);
        assert_eq!(store.size_of_crew(1), -1);
    }

    #[test]
    fn test_people_are_deduplicated() {
        let store = create_test_store();

        assert_eq!(store.unique_cast().len(), 3);
        assert_eq!(store.unique_crew().len(), 2);
        assert_eq!(store.cast(31).map(|p| p.name.as_str()), Some("Tom Hanks"));
        assert!(store.crew(31).is_none());
    }

    #[test]
    fn test_film_lists_hold_each_movie_once() {
        let store = create_test_store();

        assert_eq!(store.cast_films(31), vec![862, 863]);
        assert_eq!(store.crew_films(7879), vec![862, 863]);
        assert!(store.cast_films(1).is_empty());
    }

    #[test]
    fn test_find_people() {
        let store = create_test_store();

        let found = store.find_cast("TIM");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 12898);

        let found = store.find_crew("whedon");
        assert_eq!(found.len(), 1);
        assert!(store.find_cast("nobody").is_empty());
    }

    #[test]
    fn test_cast_stars_uses_inclusive_cutoff() {
        let mut store = CreditStore::new();
        store.add(vec![actor(5, "Lead", 3)], vec![], 100);
        store.add(vec![actor(5, "Lead", 4)], vec![], 200);

        assert_eq!(store.cast_stars_in_films(5), vec![100]);
        assert!(store.cast_stars_in_films(6).is_empty());
    }

    #[test]
    fn test_num_cast_credits_counts_every_role() {
        let store = create_test_store();

        assert_eq!(store.num_cast_credits(31), 3);
        assert_eq!(store.num_cast_credits(12898), 2);
        assert_eq!(store.num_cast_credits(7879), -1);
    }

    #[test]
    fn test_most_cast_credits() {
        let store = create_test_store();

        let ids: Vec<PersonId> = store.most_cast_credits(2).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![31, 12898]);
        assert_eq!(store.most_cast_credits(10).len(), 3);
    }

    #[test]
    fn test_remove_keeps_people() {
        let mut store = create_test_store();

        assert!(store.remove(863));
        assert!(!store.remove(863));

        assert_eq!(store.size_of_cast(863), -1);
        assert_eq!(store.len(), 1);
        // Film lists are not retracted, but removed credits no longer count
        assert_eq!(store.cast_films(31), vec![862, 863]);
        assert_eq!(store.num_cast_credits(31), 1);
        assert!(store.cast(12898).is_some());
    }
}
