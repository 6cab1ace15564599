//! Interactive terminal front end for the recommendation engine.

use anyhow::{Context, Result};
use book_recommender::{
    config::Config,
    models::{MatchKind, RecommendationSet},
    services::{CatalogIndex, CatalogStats, DiagnosticOutcome, IndexSettings, RecommendationService},
    EngineError,
};
use clap::Parser;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "recommend-cli", about = "Find books similar to one you liked")]
struct Args {
    /// CSV catalog to load (overrides RECOMMENDER_CATALOG_PATH)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Minimum fuzzy match score, 0-100
    #[arg(long)]
    threshold: Option<f64>,
}

fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
    spinner.set_message(message);
    spinner.enable_steady_tick(100);
    let result = work();
    spinner.finish_and_clear();
    result
}

/// Print `text` and read one trimmed line. `None` on end of input.
fn prompt(term: &Term, text: &str) -> io::Result<Option<String>> {
    term.write_str(text)?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn show_stats(term: &Term, stats: &CatalogStats) -> io::Result<()> {
    term.write_line(&format!("\n{}", style("Database Statistics:").bold()))?;
    term.write_line(&"=".repeat(30))?;
    for (label, value) in stats.rows() {
        term.write_line(&format!("{}: {}", label, value))?;
    }
    term.write_line(&"=".repeat(30))
}

fn show_recommendations(term: &Term, set: &RecommendationSet) -> io::Result<()> {
    if let MatchKind::Fuzzy { score } = set.match_kind {
        term.write_line(&format!(
            "Did you mean '{}'? (Match: {:.0}%)",
            style(&set.resolved_title).cyan(),
            score
        ))?;
    }
    term.write_line(&format!(
        "\nTop {} recommendations for '{}':\n",
        set.recommendations.len(),
        set.resolved_title
    ))?;
    for rec in &set.recommendations {
        term.write_line(&format!("{}. {}", rec.rank, style(&rec.title).bold()))?;
        term.write_line(&format!("   Author: {}", rec.author))?;
        term.write_line(&format!("   Rating: {:.1}", rec.rating))?;
        term.write_line(&format!("   Similarity: {:.2}\n", rec.similarity))?;
    }
    Ok(())
}

fn show_error(term: &Term, err: &EngineError) -> io::Result<()> {
    term.write_line(&style(err.to_string()).red().to_string())
}

fn recommend(term: &Term, service: &RecommendationService, default_count: usize) -> Result<bool> {
    let Some(title) = prompt(term, "\nEnter a book title: ")? else {
        return Ok(false);
    };
    if title.is_empty() {
        term.write_line("Please enter a book title!")?;
        return Ok(true);
    }

    let Some(count) = prompt(term, &format!("How many recommendations? (default {}): ", default_count))? else {
        return Ok(false);
    };
    let count = match count.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => default_count,
    };

    match service.recommend(&title, count) {
        Ok(set) => show_recommendations(term, &set)?,
        Err(e) => show_error(term, &e)?,
    }
    Ok(true)
}

fn test_system(term: &Term, service: &RecommendationService) -> io::Result<()> {
    term.write_line("\nTesting System with Popular Books:")?;
    term.write_line(&"=".repeat(40))?;
    let runs = service.diagnostics();
    if runs.is_empty() {
        term.write_line("No ratings counts in this catalog; nothing to test.")?;
    }
    for run in runs {
        term.write_line(&format!("\nTesting with: {}", run.title))?;
        match &run.outcome {
            DiagnosticOutcome::Recommendations(set) => show_recommendations(term, set)?,
            DiagnosticOutcome::Error(message) => term.write_line(message)?,
        }
        term.write_line(&"-".repeat(40))?;
    }
    Ok(())
}

fn reload(term: &Term, service: &RecommendationService, path: &Path) -> io::Result<()> {
    let outcome: std::result::Result<Arc<CatalogIndex>, EngineError> =
        with_spinner("Reloading catalog...", || service.rebuild(path));
    match outcome {
        Ok(index) => term.write_line(&format!("Reloaded {} books.", index.len())),
        Err(e) => show_error(term, &e),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_recommender=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if let Some(threshold) = args.threshold {
        config.fuzzy_threshold = threshold.clamp(0.0, 100.0);
    }

    let term = Term::stdout();
    term.write_line(&style("Welcome to the Book Recommendation System!").bold().to_string())?;
    term.write_line(&"=".repeat(50))?;

    let settings = IndexSettings {
        max_features: config.max_features,
        fuzzy_threshold: config.fuzzy_threshold,
    };
    let service = with_spinner("Loading data...", || {
        RecommendationService::from_catalog_path(&config.catalog_path, settings)
    })
    .with_context(|| {
        format!(
            "Could not build the catalog index; make sure {} exists and is a valid CSV",
            config.catalog_path.display()
        )
    })?
    .with_default_recommendations(config.default_recommendations);

    show_stats(&term, &service.stats())?;

    loop {
        term.write_line("\nWhat would you like to do?")?;
        term.write_line("1. Get book recommendations")?;
        term.write_line("2. View database statistics")?;
        term.write_line("3. Test system")?;
        term.write_line("4. Reload catalog")?;
        term.write_line("5. Exit")?;

        let Some(choice) = prompt(&term, "\nEnter your choice (1-5): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                if !recommend(&term, &service, service.default_recommendations())? {
                    break;
                }
            }
            "2" => show_stats(&term, &service.stats())?,
            "3" => test_system(&term, &service)?,
            "4" => reload(&term, &service, &config.catalog_path)?,
            "5" => {
                term.write_line("Thank you for using the Recommendation System!")?;
                break;
            }
            _ => term.write_line("Invalid choice. Please try again.")?,
        }
    }

    Ok(())
}
