// TopicModeler: preprocessing, vectorization, inference and keyword
// extraction behind a fit / get_topics / transform surface.
//
// The modeler is either unfitted (no vocabulary, no weights) or fitted. A fit
// builds a complete new state and only then swaps it in, so a failed refit
// leaves the previous model usable.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::lda::{LdaConfig, LearningMethod, VariationalLda};
use super::preprocess::{TextPreprocessor, TextResources};
use super::traits::TopicInference;
use super::types::{DocumentTopics, TopicKeywords};
use super::vectorizer::{self, CountVectorizer, VectorizerConfig, Vocabulary};
use crate::error::{Result, TopicError};

/// Constructor configuration for a TopicModeler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of latent topics (k)
    pub n_topics: usize,
    /// Absolute document-count floor for vocabulary inclusion
    pub min_document_frequency: usize,
    /// Fraction-of-documents ceiling for vocabulary inclusion
    pub max_document_frequency_ratio: f64,
    /// Cap on kept vocabulary terms
    pub max_vocabulary_size: usize,
    pub random_seed: u64,
    /// Passes over the corpus during inference
    pub max_iterations: usize,
    #[serde(default)]
    pub learning_method: LearningMethod,
}

impl ModelConfig {
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            min_document_frequency: 2,
            max_document_frequency_ratio: 0.95,
            max_vocabulary_size: 1000,
            random_seed: 42,
            max_iterations: 10,
            learning_method: LearningMethod::Online,
        }
    }

    pub fn min_document_frequency(mut self, n: usize) -> Self {
        self.min_document_frequency = n;
        self
    }

    pub fn max_document_frequency_ratio(mut self, ratio: f64) -> Self {
        self.max_document_frequency_ratio = ratio;
        self
    }

    pub fn max_vocabulary_size(mut self, n: usize) -> Self {
        self.max_vocabulary_size = n;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn learning_method(mut self, method: LearningMethod) -> Self {
        self.learning_method = method;
        self
    }

    pub fn vectorizer_config(&self) -> VectorizerConfig {
        VectorizerConfig {
            min_document_frequency: self.min_document_frequency,
            max_document_frequency_ratio: self.max_document_frequency_ratio,
            max_vocabulary_size: self.max_vocabulary_size,
        }
    }

    pub fn lda_config(&self) -> LdaConfig {
        LdaConfig::new(self.n_topics)
            .learning_method(self.learning_method)
            .max_iterations(self.max_iterations)
            .random_seed(self.random_seed)
    }

    pub fn validate(&self) -> Result<()> {
        let ratio = self.max_document_frequency_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(TopicError::InvalidConfiguration(format!(
                "max_document_frequency_ratio must be in (0, 1], got {ratio}"
            )));
        }
        if self.max_vocabulary_size == 0 {
            return Err(TopicError::InvalidConfiguration(
                "max_vocabulary_size must be a positive integer".into(),
            ));
        }
        self.lda_config().validate()
    }
}

/// Everything a successful fit produces.
#[derive(Debug, Clone)]
pub(crate) struct FittedState {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) topic_term: Array2<f64>,
    pub(crate) training_distribution: Array2<f64>,
    pub(crate) document_count: usize,
    pub(crate) fitted_at: DateTime<Utc>,
}

/// LDA topic modeler over raw review text.
#[derive(Debug, Clone)]
pub struct TopicModeler {
    config: ModelConfig,
    preprocessor: TextPreprocessor,
    engine: VariationalLda,
    state: Option<FittedState>,
}

impl TopicModeler {
    /// Create an unfitted modeler with the default English resources.
    pub fn new(config: ModelConfig) -> Result<Self> {
        Self::with_resources(config, TextResources::english())
    }

    /// Create an unfitted modeler with caller-supplied stop words and lemmatizer.
    pub fn with_resources(config: ModelConfig, resources: TextResources) -> Result<Self> {
        config.validate()?;
        let engine = VariationalLda::new(config.lda_config())?;
        info!(
            n_topics = config.n_topics,
            seed = config.random_seed,
            "Initialized topic modeler"
        );
        Ok(Self {
            config,
            preprocessor: TextPreprocessor::new(resources),
            engine,
            state: None,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn n_topics(&self) -> usize {
        self.config.n_topics
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn preprocessor(&self) -> &TextPreprocessor {
        &self.preprocessor
    }

    /// Train on a corpus, replacing any previous fit.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&mut Self> {
        if documents.is_empty() {
            return Err(TopicError::EmptyInput);
        }

        info!(documents = documents.len(), "Preprocessing documents");
        let cleaned = self.preprocessor.process(documents);
        if cleaned.is_empty() {
            return Err(TopicError::EmptyVocabulary { documents: 0 });
        }

        let vectorizer = CountVectorizer::new(self.config.vectorizer_config());
        let (vocabulary, dtm) = vectorizer.fit_transform(&cleaned)?;
        let (rows, cols) = dtm.shape();
        info!(rows, cols, tokens = dtm.total_count(), "Built document-term matrix");

        info!(n_topics = self.config.n_topics, "Fitting LDA model");
        let fitted = self.engine.fit(&dtm)?;
        info!("LDA model fitted");

        self.state = Some(FittedState {
            vocabulary,
            topic_term: fitted.topic_term,
            training_distribution: fitted.training_distribution,
            document_count: cleaned.len(),
            fitted_at: Utc::now(),
        });
        Ok(self)
    }

    /// Top `n_words` terms per topic, highest weight first.
    ///
    /// Ties go to the term that entered the vocabulary first. When `n_words`
    /// exceeds the vocabulary size every term is returned.
    pub fn get_topics(&self, n_words: usize) -> Result<Vec<TopicKeywords>> {
        if n_words == 0 {
            return Err(TopicError::InvalidConfiguration(
                "n_words must be a positive integer".into(),
            ));
        }
        let state = self.state.as_ref().ok_or(TopicError::NotFitted)?;

        let topic_mass: Vec<f64> = state.topic_term.rows().into_iter().map(|r| r.sum()).collect();
        let total_mass: f64 = topic_mass.iter().sum();

        let topics: Vec<TopicKeywords> = state
            .topic_term
            .rows()
            .into_iter()
            .enumerate()
            .map(|(topic_id, row)| {
                let mut order: Vec<usize> = (0..row.len()).collect();
                // Stable sort keeps vocabulary order among equal weights
                order.sort_by(|&a, &b| row[b].total_cmp(&row[a]));
                let keywords = order
                    .into_iter()
                    .take(n_words)
                    .filter_map(|idx| state.vocabulary.term(idx).map(str::to_string))
                    .collect();
                TopicKeywords {
                    topic_id,
                    keywords,
                    weight: if total_mass > 0.0 {
                        topic_mass[topic_id] / total_mass
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        info!(
            topics = topics.len(),
            n_words, "Extracted topic keywords"
        );
        Ok(topics)
    }

    /// Infer topic distributions for new documents with the fitted weights.
    ///
    /// Empty and whitespace-only documents are dropped; see
    /// `DocumentTopics::source_indices` to map rows back to inputs.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<DocumentTopics> {
        let state = self.state.as_ref().ok_or(TopicError::NotFitted)?;
        if documents.is_empty() {
            return Err(TopicError::EmptyInput);
        }

        let cleaned = self.preprocessor.process_indexed(documents);
        if cleaned.is_empty() {
            warn!(
                documents = documents.len(),
                "No valid documents after preprocessing"
            );
            return Ok(DocumentTopics::new(
                Array2::zeros((0, self.config.n_topics)),
                Vec::new(),
            ));
        }

        let (source_indices, texts): (Vec<usize>, Vec<String>) = cleaned.into_iter().unzip();
        let dtm = vectorizer::transform(&state.vocabulary, &texts);
        let distribution = self.engine.infer(&state.topic_term, &dtm)?;

        info!(documents = distribution.nrows(), "Transformed documents");
        Ok(DocumentTopics::new(distribution, source_indices))
    }

    /// The fitted vocabulary, in insertion order.
    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        self.state
            .as_ref()
            .map(|s| &s.vocabulary)
            .ok_or(TopicError::NotFitted)
    }

    /// Topic-term weights, shape (n_topics x vocabulary_size).
    pub fn topic_term_weights(&self) -> Result<&Array2<f64>> {
        self.state
            .as_ref()
            .map(|s| &s.topic_term)
            .ok_or(TopicError::NotFitted)
    }

    /// Document-topic distribution of the documents the model was fitted on.
    pub fn training_distribution(&self) -> Result<&Array2<f64>> {
        self.state
            .as_ref()
            .map(|s| &s.training_distribution)
            .ok_or(TopicError::NotFitted)
    }

    /// When the current model finished fitting.
    pub fn fitted_at(&self) -> Result<DateTime<Utc>> {
        self.state
            .as_ref()
            .map(|s| s.fitted_at)
            .ok_or(TopicError::NotFitted)
    }

    pub(crate) fn state(&self) -> Option<&FittedState> {
        self.state.as_ref()
    }

    pub(crate) fn set_state(&mut self, state: FittedState) {
        self.state = Some(state);
    }
}
