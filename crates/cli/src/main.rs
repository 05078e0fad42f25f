use anyhow::{bail, Context, Result};
use catalog::{movie_page_url, trailer_watch_url, CatalogService, MovieId, MovieSummary};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{
    Absence, DetailLookup, EnrichmentPipeline, GenreGrouping, Lookup, DEFAULT_BUCKET_SIZE,
};
use std::sync::Arc;
use tmdb_client::{ClientConfig, TmdbClient, DEFAULT_BASE_URL};

/// Movie Scout - search, rank and group movies from TMDB
#[derive(Parser)]
#[command(name = "movie-scout")]
#[command(about = "Search TMDB and rank results by score and genre", long_about = None)]
struct Cli {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: String,

    /// TMDB API base URL
    #[arg(long, env = "TMDB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Response language (e.g. "pt-BR")
    #[arg(long)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies and list them by score
    Search {
        /// Free-text search query
        query: String,

        /// Restrict to a genre id (e.g. 28 for Action)
        #[arg(long)]
        genre: Option<String>,

        /// Also fetch vote count and trailer for each movie
        #[arg(long)]
        details: bool,

        /// Only enrich the first N results
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON (summaries only, no per-movie lookups)
        #[arg(long, conflicts_with = "details")]
        json: bool,
    },

    /// Search movies and show the top movies of each genre
    TopGenres {
        /// Free-text search query
        query: String,

        /// Restrict to a genre id
        #[arg(long)]
        genre: Option<String>,

        /// Movies kept per genre
        #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
        bucket_size: usize,
    },

    /// List the catalog's top rated movies
    Best {
        /// Restrict to a genre id
        #[arg(long)]
        genre: Option<String>,

        /// Only enrich the first N results
        #[arg(long, default_value = "16")]
        limit: usize,
    },

    /// Show the YouTube trailer of a movie
    Trailer {
        /// TMDB movie id
        movie_id: MovieId,
    },

    /// Show the vote count of a movie
    Votes {
        /// TMDB movie id
        movie_id: MovieId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::new(cli.api_key).with_base_url(cli.base_url);
    if let Some(language) = cli.language {
        config = config.with_language(language);
    }
    let catalog: Arc<dyn CatalogService> =
        Arc::new(TmdbClient::new(config).context("Failed to create TMDB client")?);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Search {
            query,
            genre,
            details,
            limit,
            json,
        } => handle_search(catalog, &query, genre.as_deref(), details, limit, json).await?,
        Commands::TopGenres {
            query,
            genre,
            bucket_size,
        } => handle_top_genres(catalog, &query, genre.as_deref(), bucket_size).await?,
        Commands::Best { genre, limit } => handle_best(catalog, genre.as_deref(), limit).await?,
        Commands::Trailer { movie_id } => handle_trailer(catalog, movie_id).await?,
        Commands::Votes { movie_id } => handle_votes(catalog, movie_id).await?,
    }

    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    catalog: Arc<dyn CatalogService>,
    query: &str,
    genre: Option<&str>,
    details: bool,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut pipeline = EnrichmentPipeline::new(catalog.clone());
    if let Some(limit) = limit {
        pipeline = pipeline.with_result_limit(limit);
    }

    let movies = pipeline
        .aggregate(query, genre)
        .await
        .context("Failed to aggregate search results")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
        return Ok(());
    }

    if movies.is_empty() {
        println!("{}", "No movies found.".yellow());
        return Ok(());
    }

    let lookup = details.then(|| DetailLookup::new(catalog));
    for movie in &movies {
        print_movie(movie);

        if let Some(lookup) = &lookup {
            if let Some(count) = lookup.vote_count(movie.id).await {
                println!("{}Vote count: {}", "• ".cyan(), count);
            }
            if let Some(key) = lookup.trailer_key(movie.id).await {
                println!("{}Trailer: {}", "• ".cyan(), trailer_watch_url(&key));
            }
        }
        println!("{}", "-".repeat(50));
    }
    Ok(())
}

/// Handle the 'top-genres' command
async fn handle_top_genres(
    catalog: Arc<dyn CatalogService>,
    query: &str,
    genre: Option<&str>,
    bucket_size: usize,
) -> Result<()> {
    if bucket_size == 0 {
        bail!("--bucket-size must be at least 1");
    }

    let movies = EnrichmentPipeline::new(catalog)
        .aggregate(query, genre)
        .await
        .context("Failed to aggregate search results")?;
    let buckets = GenreGrouping::new(bucket_size).group_by_genre(&movies);

    if buckets.is_empty() {
        println!("{}", "No movies found.".yellow());
        return Ok(());
    }

    println!("{}", "Most popular movies by genre:".bold());
    for (genre, movies) in &buckets {
        println!("{}", format!("Genre: {}", genre).bold().blue());
        for movie in movies {
            println!("  - {} (Score: {:.1})", movie.title, movie.score_average);
        }
        println!();
    }
    Ok(())
}

/// Handle the 'best' command
async fn handle_best(
    catalog: Arc<dyn CatalogService>,
    genre: Option<&str>,
    limit: usize,
) -> Result<()> {
    let movies = EnrichmentPipeline::new(catalog)
        .with_result_limit(limit)
        .aggregate_top_rated(genre)
        .await
        .context("Failed to aggregate top rated movies")?;

    if movies.is_empty() {
        println!("{}", "No movies found.".yellow());
        return Ok(());
    }
    for (rank, movie) in movies.iter().enumerate() {
        println!(
            "{:>2}. {} ({:.1}) [{}]",
            rank + 1,
            movie.title.bold(),
            movie.score_average,
            movie.genres.join(", ")
        );
    }
    Ok(())
}

/// Handle the 'trailer' command
async fn handle_trailer(catalog: Arc<dyn CatalogService>, movie_id: MovieId) -> Result<()> {
    match DetailLookup::new(catalog).lookup_trailer_key(movie_id).await {
        Lookup::Found(key) => println!("{} {}", "✓".green(), trailer_watch_url(&key)),
        Lookup::Absent(reason) => print_absence("trailer", &reason),
    }
    Ok(())
}

/// Handle the 'votes' command
async fn handle_votes(catalog: Arc<dyn CatalogService>, movie_id: MovieId) -> Result<()> {
    match DetailLookup::new(catalog).lookup_vote_count(movie_id).await {
        Lookup::Found(count) => println!("{} {} votes", "✓".green(), count),
        Lookup::Absent(reason) => print_absence("vote count", &reason),
    }
    Ok(())
}

fn print_movie(movie: &MovieSummary) {
    println!("{}", format!("{} (ID: {})", movie.title, movie.id).bold().blue());
    println!("{}Poster: {}", "• ".green(), movie.poster_url);
    println!("{}Score: {:.1}", "• ".green(), movie.score_average);
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    println!("{}Page: {}", "• ".green(), movie_page_url(movie.id));
}

fn print_absence(what: &str, reason: &Absence) {
    let message = match reason {
        Absence::Unavailable(err) => format!("Could not fetch {}: {}", what, err),
        Absence::MissingField => format!("No valid {} on record", what),
        Absence::NoMatch => format!("No official {} found", what),
    };
    println!("{} {}", "✗".red(), message);
}
