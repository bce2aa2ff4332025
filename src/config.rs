use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::topics::lda::LearningMethod;
use crate::topics::modeler::ModelConfig;
use crate::topics::persist::default_model_path;

/// Central configuration loaded from environment variables.
///
/// Defaults mirror the analysis settings the tool has always shipped with
/// (10 topics, seed 42, 10 passes). The .env file is loaded automatically at
/// startup via dotenvy; command-line flags override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of topics to discover
    pub n_topics: usize,
    /// Keywords shown per topic
    pub top_words: usize,
    pub random_seed: u64,
    /// Inference passes over the corpus
    pub max_iterations: usize,
    /// Minimum number of reviews a term must appear in
    pub min_document_frequency: usize,
    /// Terms in more than this fraction of reviews are ignored
    pub max_document_frequency_ratio: f64,
    /// Cap on vocabulary size
    pub max_vocabulary_size: usize,
    pub learning_method: LearningMethod,
    /// Cap on reviews read from a single source
    pub max_reviews: usize,
    /// Where fitted models are saved and loaded
    pub model_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. A variable that is set but doesn't parse
    /// is an error rather than silently falling back to the default.
    pub fn load() -> Result<Self> {
        let learning_method = match env::var("REVIEWLENS_LEARNING") {
            Ok(value) => value
                .parse::<LearningMethod>()
                .context("Invalid REVIEWLENS_LEARNING")?,
            Err(_) => LearningMethod::Online,
        };

        Ok(Self {
            n_topics: parse_var("REVIEWLENS_TOPICS", 10)?,
            top_words: parse_var("REVIEWLENS_TOP_WORDS", 10)?,
            random_seed: parse_var("REVIEWLENS_SEED", 42)?,
            max_iterations: parse_var("REVIEWLENS_MAX_ITER", 10)?,
            min_document_frequency: parse_var("REVIEWLENS_MIN_DF", 2)?,
            max_document_frequency_ratio: parse_var("REVIEWLENS_MAX_DF", 0.95)?,
            max_vocabulary_size: parse_var("REVIEWLENS_MAX_FEATURES", 1000)?,
            learning_method,
            max_reviews: parse_var("REVIEWLENS_MAX_REVIEWS", 1000)?,
            model_path: env::var("REVIEWLENS_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_model_path()),
        })
    }

    /// The modeler configuration these settings describe, validated.
    pub fn model_config(&self) -> Result<ModelConfig> {
        let config = ModelConfig::new(self.n_topics)
            .min_document_frequency(self.min_document_frequency)
            .max_document_frequency_ratio(self.max_document_frequency_ratio)
            .max_vocabulary_size(self.max_vocabulary_size)
            .random_seed(self.random_seed)
            .max_iterations(self.max_iterations)
            .learning_method(self.learning_method);
        config.validate()?;
        Ok(config)
    }

    /// Check that a saved model exists before commands that need one.
    pub fn require_model(&self) -> Result<()> {
        if !self.model_path.exists() {
            anyhow::bail!(
                "No saved model at {}\n\
                 Run `reviewlens model --input <file> --save` to fit and save one,\n\
                 or set REVIEWLENS_MODEL_PATH to an existing model file.",
                self.model_path.display()
            );
        }
        Ok(())
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {name}: '{value}'")),
        Err(_) => Ok(default),
    }
}
