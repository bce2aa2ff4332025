use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use reviewlens::config::Config;
use reviewlens::output::{report, terminal};
use reviewlens::reviews::file::FileReviewSource;
use reviewlens::reviews::models::{review_texts, Review};
use reviewlens::reviews::traits::ReviewSource;
use reviewlens::topics::persist;
use reviewlens::TopicModeler;

/// reviewlens: discover what customers talk about in product reviews.
///
/// Fits an LDA topic model over review text, prints the topics it finds,
/// and scores new reviews against a saved model.
#[derive(Parser)]
#[command(name = "reviewlens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a topic model on a review file and show the topics
    Model {
        /// Review file: JSON array of reviews/strings, or one review per line
        #[arg(long)]
        input: PathBuf,

        /// Number of topics (default: REVIEWLENS_TOPICS or 10)
        #[arg(long)]
        topics: Option<usize>,

        /// Keywords shown per topic (default: REVIEWLENS_TOP_WORDS or 10)
        #[arg(long)]
        words: Option<usize>,

        /// Random seed for inference (default: REVIEWLENS_SEED or 42)
        #[arg(long)]
        seed: Option<u64>,

        /// Save the fitted model to the model path
        #[arg(long)]
        save: bool,

        /// Print a JSON report instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Show the topics of a saved model
    Topics {
        /// Model file (default: REVIEWLENS_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Keywords shown per topic
        #[arg(long)]
        words: Option<usize>,

        /// Print JSON instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Score new reviews against a saved model
    Transform {
        /// Review file to score
        #[arg(long)]
        input: PathBuf,

        /// Model file (default: REVIEWLENS_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Print a JSON report instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so --json output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reviewlens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Model {
            input,
            topics,
            words,
            seed,
            save,
            json,
        } => {
            if let Some(n) = topics {
                config.n_topics = n;
            }
            if let Some(s) = seed {
                config.random_seed = s;
            }
            let n_words = words.unwrap_or(config.top_words);

            let reviews = load_reviews(&input, config.max_reviews)?;
            let texts = review_texts(&reviews);

            let mut modeler = TopicModeler::new(config.model_config()?)?;
            fit_with_spinner(&mut modeler, &texts)?;

            let topics = modeler.get_topics(n_words)?;
            let distributions = modeler.transform(&texts)?;

            if json {
                let report = report::build_report(&reviews, topics, &distributions);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_topics(&topics, distributions.n_documents());
                terminal::display_distributions(&reviews, &topics, &distributions);
            }

            if save {
                persist::save_model(&modeler, &config.model_path)?;
                if !json {
                    println!(
                        "\n{}",
                        format!("Model saved to {}", config.model_path.display()).bold()
                    );
                }
            }
        }

        Commands::Topics { model, words, json } => {
            if let Some(path) = model {
                config.model_path = path;
            }
            config.require_model()?;
            let modeler = persist::load_model(&config.model_path)?;
            let topics = modeler.get_topics(words.unwrap_or(config.top_words))?;
            let training_docs = modeler.training_distribution()?.nrows();

            if json {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else {
                terminal::display_topics(&topics, training_docs);
            }
        }

        Commands::Transform { input, model, json } => {
            if let Some(path) = model {
                config.model_path = path;
            }
            config.require_model()?;
            let modeler = persist::load_model(&config.model_path)?;

            let reviews = load_reviews(&input, config.max_reviews)?;
            let texts = review_texts(&reviews);
            let distributions = modeler.transform(&texts)?;
            let topics = modeler.get_topics(config.top_words)?;

            if json {
                let report = report::build_report(&reviews, topics, &distributions);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_distributions(&reviews, &topics, &distributions);
            }
        }

        Commands::Config => {
            terminal::display_config(&config);
        }
    }

    Ok(())
}

/// Read reviews from a local file, capped at `limit`.
fn load_reviews(path: &Path, limit: usize) -> Result<Vec<Review>> {
    let source = FileReviewSource;
    let reviews = source.fetch_reviews(&path.to_string_lossy(), limit)?;
    if reviews.is_empty() {
        anyhow::bail!("No reviews found in {}", path.display());
    }
    let blank = reviews.iter().filter(|r| r.is_blank()).count();
    if blank > 0 {
        warn!(blank, "Blank reviews will be skipped");
    }
    info!(source = source.name(), reviews = reviews.len(), "Reviews ready");
    Ok(reviews)
}

/// Fit the model with a spinner on the terminal while inference runs.
fn fit_with_spinner(modeler: &mut TopicModeler, texts: &[String]) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("  {spinner} {msg} ({elapsed})")?);
    spinner.set_message(format!(
        "Fitting {} topics on {} reviews",
        modeler.n_topics(),
        texts.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = modeler.fit(texts).map(|_| ());
    spinner.finish_and_clear();
    Ok(result?)
}
