// Swap-ready abstractions for the topic pipeline.
//
// The modeler depends on these traits rather than on concrete types, so the
// lemmatizer can be replaced with a dictionary-backed one and the inference
// engine with a sampling-based one without touching the rest of the pipeline.

use std::borrow::Cow;

use ndarray::Array2;

use super::vectorizer::DocumentTermMatrix;
use crate::error::Result;

/// Reduces a lowercase token to its dictionary base form.
pub trait Lemmatizer: Send + Sync {
    /// Lemmatize a single token. Returning the token unchanged is always valid.
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

/// The learned parameters of a fitted topic model.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTopics {
    /// Topic-term weights, shape (n_topics x vocabulary_size)
    pub topic_term: Array2<f64>,
    /// Document-topic distribution of the training documents, shape (documents x n_topics)
    pub training_distribution: Array2<f64>,
}

/// A bag-of-words topic inference algorithm.
pub trait TopicInference {
    /// Learn topics from a count matrix.
    fn fit(&self, dtm: &DocumentTermMatrix) -> Result<FittedTopics>;

    /// Infer normalized document-topic distributions with the topic-term
    /// weights held fixed. One row per matrix row.
    fn infer(&self, topic_term: &Array2<f64>, dtm: &DocumentTermMatrix) -> Result<Array2<f64>>;
}
