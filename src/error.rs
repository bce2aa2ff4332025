// Error taxonomy for the topic-modeling core.
//
// The modeling core returns these typed errors. The application layer
// (main.rs, review sources, model files) works in anyhow::Result and wraps
// them on the way out.

use thiserror::Error;

/// Everything the topic modeler can refuse to do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopicError {
    /// A parameter is outside its valid range (n_topics = 0, n_words = 0, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An empty document list was passed to fit or transform
    #[error("no documents given: the input list is empty")]
    EmptyInput,

    /// Frequency filtering left zero terms in the vocabulary
    #[error(
        "empty vocabulary: no terms survived document-frequency filtering across {documents} documents"
    )]
    EmptyVocabulary { documents: usize },

    /// get_topics or transform was called before a successful fit
    #[error("model is not fitted: call fit() first")]
    NotFitted,

    /// Inference cannot run on the matrix it was handed
    #[error("model fit failed: {0}")]
    ModelFit(String),
}

pub type Result<T> = std::result::Result<T, TopicError>;
