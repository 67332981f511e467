use movie_store::{StoreConfig, Stores};
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data_dir = Path::new("data/tmdb");
    let config = StoreConfig::default()
        .with_movie_capacity(65_536)
        .with_rating_capacity(1 << 21)
        .with_credit_capacity(65_536)
        .with_person_capacity(1 << 19);

    println!("Loading dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let stores = Stores::load_from_files(data_dir, &config).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let ratings = stores.ratings.len();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", stores.movies.len());
    println!("Collections: {}", stores.movies.num_collections());
    println!("Credit lists: {}", stores.credits.len());
    println!("Ratings: {}", ratings);
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );

    let start = Instant::now();
    let top = stores.ratings.most_rated_movies(10);
    println!(
        "Ranked {} most rated movies in {:?}",
        top.len(),
        start.elapsed()
    );
}
