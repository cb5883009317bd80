use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use serde::Serialize;
use server::config::MAX_RESULTS;
use server::{CatalogSnapshot, EngineConfig, MovieEngine, MovieSummary, Recommendation};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations and mood browsing", long_about = None)]
struct Cli {
    /// Directory holding the TMDB CSV files
    #[arg(short, long, env = "REEL_RECS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory for the catalog and similarity cache
    #[arg(short, long, env = "REEL_RECS_CACHE_DIR", default_value = "cache")]
    cache_dir: PathBuf,

    /// Pre-fetched enrichment metadata (JSON) for the raw CSV layout
    #[arg(long, env = "REEL_RECS_METADATA_FILE")]
    metadata_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the cached catalog or build it from the source files
    Build {
        /// Ignore the cache and rebuild from the source files
        #[arg(long)]
        force: bool,
    },

    /// Recommend movies similar to a title
    Recommend {
        /// Movie title (case-insensitive, approximate matches allowed)
        title: String,

        /// Maximum number of recommendations (1-20)
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..=MAX_RESULTS as i64))]
        limit: u16,

        /// Show similarity, reason and composite score
        #[arg(long)]
        explain: bool,
    },

    /// Movies for a free-text mood description
    Mood {
        /// e.g. "I had a tough day, need a laugh"
        text: String,
    },

    /// Movies for a mood or genre category name
    Category {
        /// e.g. "Horror", "Intense/Mystery", "Superhero"
        name: String,
    },

    /// Movies with a genre
    Genre { name: String },

    /// Movies crediting a person
    Person {
        /// "cast" or "director"
        #[arg(long, default_value = "cast")]
        role: String,

        name: String,
    },

    /// Best rated widely voted movies
    Top,

    /// Title suggestions for a search string
    Search { query: String },

    /// Overview text by id or title
    Overview {
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        title: Option<String>,
    },

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::default()
        .with_data_dir(&cli.data_dir)
        .with_cache_dir(&cli.cache_dir);
    if let Some(path) = &cli.metadata_file {
        config = config.with_metadata_file(path);
    }
    if let Commands::Recommend { limit, .. } = &cli.command {
        config = config.with_max_results(usize::from(*limit));
    }
    let engine = Arc::new(MovieEngine::new(config));

    let force = matches!(cli.command, Commands::Build { force: true });
    let snapshot = load_catalog(engine.clone(), force).await?;

    let json = cli.json;
    match cli.command {
        Commands::Build { .. } => {}
        Commands::Recommend { title, explain, .. } => {
            let recommendations = run_blocking(&engine, move |engine| Ok(engine.recommend(&title))).await?;
            output(json, &recommendations, |recs| print_recommendations(recs, explain))?;
        }
        Commands::Mood { text } => {
            let results = run_blocking(&engine, move |engine| Ok(engine.movies_by_mood_text(&text)?)).await?;
            output(json, &results, |r| {
                print_movies(&format!("Mood: {}", r.mood), &r.movies);
            })?;
        }
        Commands::Category { name } => {
            let results = run_blocking(&engine, move |engine| Ok(engine.movies_by_category(&name)?)).await?;
            output(json, &results, |r| {
                print_movies(&format!("Category: {}", r.category), &r.movies);
            })?;
        }
        Commands::Genre { name } => {
            let header = format!("Genre: {}", name);
            let movies = run_blocking(&engine, move |engine| Ok(engine.movies_by_genre(&name)?)).await?;
            output(json, &movies, |m| print_movies(&header, m))?;
        }
        Commands::Person { role, name } => {
            let header = format!("{} ({})", name, role);
            let movies = run_blocking(&engine, move |engine| Ok(engine.movies_by_person(&role, &name)?)).await?;
            output(json, &movies, |m| print_movies(&header, m))?;
        }
        Commands::Top => {
            let movies = run_blocking(&engine, |engine| Ok(engine.top_rated()?)).await?;
            output(json, &movies, |m| print_movies("Top rated", m))?;
        }
        Commands::Search { query } => {
            let header = format!("Search results for '{}':", query);
            let titles = run_blocking(&engine, move |engine| Ok(engine.search_suggestions(&query)?)).await?;
            output(json, &titles, |titles| {
                println!("{}", header.bold().blue());
                for title in titles {
                    println!("  {}", title);
                }
            })?;
        }
        Commands::Overview { id, title } => {
            let overview =
                run_blocking(&engine, move |engine| Ok(engine.overview(id, title.as_deref())?)).await?;
            output(json, &overview, |text| {
                if text.is_empty() {
                    println!("{}", "No overview found".yellow());
                } else {
                    println!("{}", text);
                }
            })?;
        }
        Commands::Benchmark { requests, concurrent } => {
            handle_benchmark(engine, snapshot.catalog(), requests, concurrent).await?
        }
    }

    Ok(())
}

/// Load or build the snapshot off the async runtime
async fn load_catalog(engine: Arc<MovieEngine>, force: bool) -> Result<Arc<CatalogSnapshot>> {
    println!("Loading catalog from {}...", engine.config().data_dir.display());
    let start = Instant::now();

    let snapshot = tokio::task::spawn_blocking(move || {
        if force {
            engine.rebuild()
        } else {
            engine.load_or_build_catalog()
        }
    })
    .await
    .context("Catalog task panicked")?
    .context("Failed to load movie catalog")?;

    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        snapshot.len(),
        start.elapsed()
    );
    Ok(snapshot)
}

async fn run_blocking<T, F>(engine: &Arc<MovieEngine>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&MovieEngine) -> Result<T> + Send + 'static,
{
    let engine = engine.clone();
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .context("Query task panicked")?
}

fn output<T: Serialize>(json: bool, value: &T, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

/// Handle the 'benchmark' command
///
/// `catalog` is the snapshot already loaded by [`load_catalog`].
async fn handle_benchmark(
    engine: Arc<MovieEngine>,
    catalog: &Catalog,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let titles = sample_titles(catalog, requests);
    if titles.is_empty() {
        println!("{}", "Nothing to benchmark".yellow());
        return Ok(());
    }
    info!(requests, concurrent, "Starting benchmark");

    let wall = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(titles.len());
    for batch in titles.chunks(concurrent.max(1)) {
        let mut handles = Vec::with_capacity(batch.len());
        for title in batch {
            let engine = engine.clone();
            let title = title.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                engine.recommend(&title);
                start.elapsed()
            }));
        }
        for handle in handles {
            timings.push(handle.await?);
        }
    }
    let wall_time = wall.elapsed();

    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    timings.sort();
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Random catalog titles, one per request
fn sample_titles(catalog: &Catalog, requests: usize) -> Vec<String> {
    if catalog.is_empty() {
        return Vec::new();
    }
    (0..requests)
        .filter_map(|_| catalog.get(rand::random_range(0..catalog.len())))
        .map(|record| record.title.clone())
        .collect()
}

/// Nearest-rank percentile of sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    sorted[((sorted.len() as f64 * p) as usize).min(sorted.len() - 1)]
}

fn print_recommendations(recommendations: &[Recommendation], explain: bool) {
    print!("{}", "Movie Recommendations:\n".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        let movie = &rec.movie;
        if rec.is_sentinel() {
            println!("{}", movie.title.yellow());
            continue;
        }

        println!(
            "{}. {} ({}) [{}] - {}",
            (i + 1).to_string().green(),
            movie.title,
            movie.year,
            movie.genres.join(", "),
            rating(movie.vote_average)
        );
        if explain {
            let reason = rec.recommendation_reason.map(|r| r.label()).unwrap_or("-");
            match rec.similarity_score {
                Some(similarity) => println!(
                    "   {} | similarity {:.3} | score {:.2}",
                    reason.cyan(),
                    similarity,
                    rec.score
                ),
                None => println!("   {} | score {:.2}", reason.cyan(), rec.score),
            }
        }
    }
}

fn print_movies(header: &str, movies: &[MovieSummary]) {
    println!("{}", header.bold().blue());
    if movies.is_empty() {
        println!("{}", "No movies found".yellow());
    }
    for (i, movie) in movies.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - {}",
            (i + 1).to_string().green(),
            movie.title,
            movie.year,
            movie.genres.join(", "),
            rating(movie.vote_average)
        );
    }
}

fn rating(vote_average: Option<f32>) -> String {
    vote_average.map_or_else(|| "unrated".to_string(), |r| format!("{:.1}", r))
}
