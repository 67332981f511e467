use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use movie_store::{CollectionId, MovieId, Person, StoreConfig, Stores};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Movie Store - query a TMDB-style movie dataset
#[derive(Parser)]
#[command(name = "movie-store")]
#[command(about = "Load a movie dataset into memory and query it", long_about = None)]
struct Cli {
    /// Directory holding movies.jsonl, credits.jsonl and ratings.dat
    #[arg(short, long, default_value = "data/tmdb")]
    data_dir: PathBuf,

    /// Initial capacity of the movie table
    #[arg(long)]
    movie_capacity: Option<usize>,

    /// Initial capacity of the rating table
    #[arg(long)]
    rating_capacity: Option<usize>,

    /// Initial capacity of the per-movie credit tables
    #[arg(long)]
    credit_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show everything known about one movie
    Movie {
        #[arg(long)]
        id: MovieId,
    },

    /// Search titles, original titles and overviews
    Search {
        /// Case-insensitive substring
        #[arg(long)]
        term: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List movies released strictly between two dates
    Released {
        /// Exclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Exclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },

    /// Show a collection and its films
    Collection {
        #[arg(long)]
        id: CollectionId,
    },

    /// Movies with the most ratings
    MostRated {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Movies with the highest average rating
    TopRated {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Users who rated the most movies
    ActiveUsers {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Find cast and crew by name and list their films
    Person {
        /// Case-insensitive substring
        #[arg(long)]
        name: String,
    },

    /// Cast members with the most credits
    MostCredited {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::default();
        if let Some(capacity) = self.movie_capacity {
            config = config.with_movie_capacity(capacity);
        }
        if let Some(capacity) = self.rating_capacity {
            config = config.with_rating_capacity(capacity);
        }
        if let Some(capacity) = self.credit_capacity {
            config = config.with_credit_capacity(capacity);
        }
        config
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let stores = Stores::load_from_files(&cli.data_dir, &cli.store_config())
        .with_context(|| format!("Failed to load dataset from {}", cli.data_dir.display()))?;
    println!(
        "{} Loaded {} movies, {} ratings, {} credit lists in {:?}",
        "✓".green(),
        stores.movies.len(),
        stores.ratings.len(),
        stores.credits.len(),
        start.elapsed()
    );

    info!(
        movies = stores.movies.len(),
        ratings = stores.ratings.len(),
        credits = stores.credits.len(),
        "dataset ready"
    );

    match cli.command {
        Commands::Movie { id } => handle_movie(&stores, id)?,
        Commands::Search { term, limit } => handle_search(&stores, &term, limit),
        Commands::Released { start, end } => handle_released(&stores, start, end)?,
        Commands::Collection { id } => handle_collection(&stores, id)?,
        Commands::MostRated { limit } => {
            print_header("Most rated movies");
            for (rank, id) in stores.ratings.most_rated_movies(limit).into_iter().enumerate() {
                print_movie_line(&stores, rank + 1, id);
            }
        }
        Commands::TopRated { limit } => {
            print_header("Top rated movies");
            for (rank, id) in stores
                .ratings
                .top_average_rated_movies(&stores.movies, limit)
                .into_iter()
                .enumerate()
            {
                print_movie_line(&stores, rank + 1, id);
            }
        }
        Commands::ActiveUsers { limit } => {
            print_header("Most active users");
            for (rank, user_id) in stores.ratings.most_rated_users(limit).into_iter().enumerate() {
                let ratings = stores.ratings.user_ratings(user_id);
                println!(
                    "{}. user {} - {} ratings, avg {:.2}",
                    (rank + 1).to_string().green(),
                    user_id,
                    ratings.len(),
                    stores.ratings.user_average_rating(user_id)
                );
            }
        }
        Commands::Person { name } => handle_person(&stores, &name),
        Commands::MostCredited { limit } => {
            print_header("Most credited cast");
            for (rank, person) in stores.credits.most_cast_credits(limit).into_iter().enumerate() {
                println!(
                    "{}. {} ({} credits)",
                    (rank + 1).to_string().green(),
                    person.name,
                    stores.credits.num_cast_credits(person.id)
                );
            }
        }
    }

    Ok(())
}

/// Handle the 'movie' command
#[instrument(skip(stores))]
fn handle_movie(stores: &Stores, id: MovieId) -> Result<()> {
    let movies = &stores.movies;
    let title = movies.title(id).ok_or_else(|| anyhow!("Movie {} not found", id))?;

    print_header(title);
    if let Some(tagline) = movies.tagline(id).filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic());
    }
    if let Some(release) = movies.release(id) {
        println!("{}Released: {}", "• ".green(), release);
    }
    if let Some(genres) = movies.genres(id) {
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        println!("{}Genres: {}", "• ".green(), names.join(", "));
    }
    println!("{}Runtime: {} min", "• ".green(), movies.runtime(id));
    println!(
        "{}TMDB vote: {:.1} ({} votes), popularity {:.2}",
        "• ".green(),
        movies.vote_average(id),
        movies.vote_count(id),
        movies.popularity(id)
    );
    if let Some(imdb) = movies.imdb(id) {
        println!("{}IMDb: {}", "• ".green(), imdb);
    }

    println!(
        "{}User ratings: {} (avg {:.2})",
        "• ".cyan(),
        stores.ratings.num_ratings(movies, id),
        stores.ratings.movie_average_rating(movies, id)
    );

    let collection_id = movies.collection_id(id);
    if let Some(name) = movies.collection_name(collection_id) {
        println!("{}Collection: {} (id {})", "• ".cyan(), name, collection_id);
    }

    let cast = stores.credits.film_cast(id);
    if !cast.is_empty() {
        println!("Cast:");
        for credit in cast.iter().take(10) {
            println!("  - {} as {}", credit.name, credit.character);
        }
    }
    for credit in stores
        .credits
        .film_crew(id)
        .iter()
        .filter(|c| c.job == "Director")
    {
        println!("Directed by {}", credit.name);
    }

    Ok(())
}

/// Handle the 'search' command
#[instrument(skip(stores))]
fn handle_search(stores: &Stores, term: &str, limit: usize) {
    let mut matches = stores.movies.find_films(term);
    matches.sort_unstable();
    debug!(found = matches.len(), "search finished");

    print_header(&format!("Search results for '{}' ({} found)", term, matches.len()));
    for (rank, id) in matches.into_iter().take(limit).enumerate() {
        print_movie_line(stores, rank + 1, id);
    }
}

/// Handle the 'released' command
#[instrument(skip(stores))]
fn handle_released(stores: &Stores, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start >= end {
        return Err(anyhow!("start date {} must be before end date {}", start, end));
    }

    let mut ids = stores.movies.all_ids_released_in_range(start, end);
    ids.sort_by_key(|&id| (stores.movies.release(id), id));

    print_header(&format!("Released between {} and {}", start, end));
    for id in ids {
        let release = stores.movies.release(id).map(|d| d.to_string()).unwrap_or_default();
        println!("{} {} - {}", release, id, stores.movies.title(id).unwrap_or_default());
    }
    Ok(())
}

/// Handle the 'collection' command
#[instrument(skip(stores))]
fn handle_collection(stores: &Stores, id: CollectionId) -> Result<()> {
    let name = stores
        .movies
        .collection_name(id)
        .ok_or_else(|| anyhow!("Collection {} not found", id))?;

    print_header(name);
    for (rank, film) in stores.movies.films_in_collection(id).into_iter().enumerate() {
        print_movie_line(stores, rank + 1, film);
    }
    Ok(())
}

/// Handle the 'person' command
#[instrument(skip(stores))]
fn handle_person(stores: &Stores, name: &str) {
    let cast = stores.credits.find_cast(name);
    let crew = stores.credits.find_crew(name);

    if cast.is_empty() && crew.is_empty() {
        println!("No cast or crew matching '{}'", name);
        return;
    }

    for person in &cast {
        print_person(stores, person, "Cast", stores.credits.cast_films(person.id));
        let starring = stores.credits.cast_stars_in_films(person.id);
        println!("  starring in {} of them", starring.len());
    }
    for person in &crew {
        print_person(stores, person, "Crew", stores.credits.crew_films(person.id));
    }
}

fn print_person(stores: &Stores, person: &Person, role: &str, films: Vec<MovieId>) {
    println!("{} {} ({}, id {})", "•".green(), person.name.bold(), role, person.id);
    for id in films {
        println!("    {} - {}", id, stores.movies.title(id).unwrap_or("<unknown>"));
    }
}

fn print_header(text: &str) {
    println!("{}", text.bold().blue());
}

fn print_movie_line(stores: &Stores, rank: usize, id: MovieId) {
    let year = stores
        .movies
        .release(id)
        .map(|d| d.format("%Y").to_string())
        .unwrap_or_else(|| "????".to_string());
    println!(
        "{}. {} ({}) - avg {:.2} from {} ratings",
        rank.to_string().green(),
        stores.movies.title(id).unwrap_or("<unknown>"),
        year,
        stores.ratings.movie_average_rating(&stores.movies, id),
        stores.ratings.num_ratings(&stores.movies, id)
    );
}
