use anyhow::{bail, Context, Result};
use catalog::{Catalog, UserId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{
    InMemoryWatchlistStore, MovieRecommendation, RecommendationEngine, WatchReport,
    WatchlistService, WatchlistStore,
};
use rand::Rng;
use similarity::FeatureExtractor;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::warn;

/// Id of the throwaway user behind the `recommend` command
const ONE_SHOT_USER: UserId = 0;

/// Ends the title prompt of an interactive session
const END_OF_INPUT: &str = "END";

/// ReelMatch - hybrid content/item-item movie recommender
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Movie recommendations from genre similarity", long_about = None)]
struct Cli {
    /// Path to the movie catalog CSV (id,title,genres,vote_average,revenue)
    #[arg(short, long, default_value = "data/movies.csv")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies for a list of watched titles
    Recommend {
        /// Watched titles in watch order (case-insensitive substring match)
        #[arg(long, required = true, num_args = 1..)]
        watched: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: enter watched titles, then get recommendations
    Session {
        /// User ID to record the watch history under
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
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
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = load_catalog(&cli.catalog)?;

    match cli.command {
        Commands::Recommend {
            watched,
            limit,
            json,
        } => {
            let (engine, watchlist) = build_engine(catalog)?;
            handle_recommend(&engine, &watchlist, &watched, limit, json)?
        }
        Commands::Session { user_id, limit } => {
            let (engine, watchlist) = build_engine(catalog)?;
            handle_session(&engine, &watchlist, user_id, limit)?
        }
        Commands::Search { title } => handle_search(&catalog, &title)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let (engine, watchlist) = build_engine(catalog)?;
            handle_benchmark(Arc::new(engine), &watchlist, requests, concurrent).await?
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Arc<Catalog>> {
    println!("Loading movie catalog from {}...", path.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(path)
        .with_context(|| format!("Failed to load movie catalog from {}", path.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Fit features, build both indices and wire them to one watchlist store
fn build_engine(catalog: Arc<Catalog>) -> Result<(RecommendationEngine, WatchlistService)> {
    let start = Instant::now();
    let store: Arc<dyn WatchlistStore> = Arc::new(InMemoryWatchlistStore::new());
    let engine = RecommendationEngine::build(catalog.clone(), store.clone(), &FeatureExtractor::new())
        .context("Failed to build similarity indices")?;
    println!(
        "{} Built similarity indices in {:?}",
        "✓".green(),
        start.elapsed()
    );
    Ok((engine, WatchlistService::new(catalog, store)))
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    watchlist: &WatchlistService,
    titles: &[String],
    limit: usize,
    json: bool,
) -> Result<()> {
    watchlist.register_user(ONE_SHOT_USER);
    for title in titles {
        watchlist
            .add_watched_by_title(ONE_SHOT_USER, title)
            .with_context(|| format!("Cannot mark '{}' as watched", title))?;
    }

    let recommendations = engine
        .recommend(ONE_SHOT_USER, limit)
        .context("Failed to compute recommendations")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_watchlist(watchlist, ONE_SHOT_USER)?;
        print_recommendations(&recommendations);
    }
    Ok(())
}

/// Handle the 'session' command
fn handle_session(
    engine: &RecommendationEngine,
    watchlist: &WatchlistService,
    user_id: UserId,
    limit: usize,
) -> Result<()> {
    watchlist.register_user(user_id);
    println!(
        "Enter the titles you have watched, one per line. Type {} when done.",
        END_OF_INPUT.bold()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", ">".cyan());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let title = line.context("Failed to read from stdin")?;
        let title = title.trim();

        if title.eq_ignore_ascii_case(END_OF_INPUT) {
            break;
        }
        if title.is_empty() {
            continue;
        }

        // Unknown titles are reported and skipped
        match watchlist.add_watched_by_title(user_id, title) {
            Ok(movie) => println!("{} Added '{}'", "✓".green(), movie.title),
            Err(err) => println!("{} {}", "✗".red(), err),
        }
    }

    print_watchlist(watchlist, user_id)?;

    let recommendations = engine
        .recommend(user_id, limit)
        .context("Failed to compute recommendations")?;
    print_recommendations(&recommendations);

    print_report(&watchlist.report(user_id)?);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, title: &str) -> Result<()> {
    let matches = catalog.search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for movie in matches.iter().take(20) {
        println!(
            "{}: {} [{}] rating {:.1}",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            movie.vote_average
        );
    }
    if matches.len() > 20 {
        println!("  ... and {} more", matches.len() - 20);
    }
    Ok(())
}

/// Handle the 'benchmark' command
///
/// Registers one user per request with a random watch history, then
/// issues the requests from blocking tasks, at most `concurrent` at once.
async fn handle_benchmark(
    engine: Arc<RecommendationEngine>,
    watchlist: &WatchlistService,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let catalog = engine.catalog().clone();
    if catalog.is_empty() {
        bail!("Cannot benchmark an empty catalog");
    }

    let user_ids = benchmark_user_ids(requests)?;
    let concurrent = concurrent.max(1);
    {
        let mut rng = rand::rng();
        for &user_id in &user_ids {
            watchlist.register_user(user_id);
            let history_len = rng.random_range(1..=5);
            for _ in 0..history_len {
                let position = rng.random_range(0..catalog.len());
                if let Some(movie) = catalog.movie_at(position) {
                    watchlist.add_watched(user_id, movie.id)?;
                }
            }
        }
    }

    let semaphore = Arc::new(Semaphore::new(concurrent));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for user_id in user_ids {
        let permit = semaphore.clone().acquire_owned().await?;
        let engine = engine.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            engine.recommend_default(user_id)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(err) => warn!("Request failed: {:#}", err),
        }
    }
    let wall_time = started.elapsed();

    if timings.is_empty() {
        bail!("Every benchmark request failed");
    }

    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// One fresh user id per benchmark request, starting after `ONE_SHOT_USER`
fn benchmark_user_ids(requests: usize) -> Result<Vec<UserId>> {
    let last = UserId::try_from(requests)
        .with_context(|| format!("--requests {} exceeds the user id range", requests))?;
    Ok((1..=last).collect())
}

fn print_watchlist(watchlist: &WatchlistService, user_id: UserId) -> Result<()> {
    let watched = watchlist.list_watched(user_id)?;

    println!("{}", format!("Watchlist of user {}:", user_id).bold().blue());
    for (movie_id, title) in &watched {
        println!("  {} {} ({})", "•".green(), title, movie_id);
    }
    Ok(())
}

fn print_recommendations(recommendations: &[MovieRecommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  (nothing to recommend yet)");
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}] - Score: {:.2} ({})",
            (rank + 1).to_string().green(),
            rec.title,
            rec.genres.join(", "),
            rec.score,
            rec.source
        );
    }
}

fn print_report(report: &WatchReport) {
    println!("{}", "Watch report:".bold().blue());
    if report.is_empty() {
        println!("  (no watched movies)");
        return;
    }

    println!("{}Movies: {}", "• ".cyan(), report.movie_count);

    println!("{}Rating distribution:", "• ".cyan());
    for bin in report.rating_histogram.iter().filter(|b| b.count > 0) {
        println!(
            "    {:>4.1}-{:<4.1} {}",
            bin.lower,
            bin.upper,
            "#".repeat(bin.count)
        );
    }

    println!("{}Revenue by rating:", "• ".cyan());
    for (rating, revenue) in &report.revenue_by_rating {
        println!("    {:.1}  ${:.0}", rating, revenue);
    }

    println!("{}Top genres:", "• ".cyan());
    for (genre, count) in &report.top_genres {
        println!("    {} ({})", genre, count);
    }
}
