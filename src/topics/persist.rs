// Saving and loading fitted models as JSON.
//
// Only the learned state is stored: configuration, vocabulary and topic-term
// weights. Text resources are not serialized; a loaded model uses whatever
// resources the caller constructs it with (English by default), so save and
// load with the same resources to get identical transforms.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::modeler::{FittedState, ModelConfig, TopicModeler};
use super::preprocess::TextResources;
use super::vectorizer::Vocabulary;
use crate::error::TopicError;

/// Bumped whenever the JSON layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized form of a fitted TopicModeler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub format_version: u32,
    pub config: ModelConfig,
    pub vocabulary: Vec<String>,
    /// Topic-term weights, shape (n_topics x vocabulary)
    pub topic_term: Array2<f64>,
    /// Training document-topic distribution, shape (documents x n_topics)
    pub training_distribution: Array2<f64>,
    pub document_count: usize,
    pub fitted_at: DateTime<Utc>,
}

/// Returns the default path for the saved model.
/// Uses the platform data directory: ~/.local/share/reviewlens/model.json on Linux.
pub fn default_model_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reviewlens")
        .join("model.json")
}

impl TopicModeler {
    /// Snapshot the fitted state. Fails with NotFitted on an unfitted model.
    pub fn to_saved(&self) -> std::result::Result<SavedModel, TopicError> {
        let state = self.state().ok_or(TopicError::NotFitted)?;
        Ok(SavedModel {
            format_version: FORMAT_VERSION,
            config: self.config().clone(),
            vocabulary: state.vocabulary.terms().to_vec(),
            topic_term: state.topic_term.clone(),
            training_distribution: state.training_distribution.clone(),
            document_count: state.document_count,
            fitted_at: state.fitted_at,
        })
    }

    /// Rebuild a fitted modeler from a snapshot.
    pub fn from_saved(
        saved: SavedModel,
        resources: TextResources,
    ) -> std::result::Result<Self, TopicError> {
        if saved.format_version != FORMAT_VERSION {
            return Err(TopicError::InvalidConfiguration(format!(
                "unsupported model format version {} (expected {FORMAT_VERSION})",
                saved.format_version
            )));
        }

        let vocabulary = Vocabulary::from_terms(saved.vocabulary);
        let expected = (saved.config.n_topics, vocabulary.len());
        if saved.topic_term.dim() != expected || vocabulary.is_empty() {
            return Err(TopicError::ModelFit(format!(
                "saved weights are {:?}, expected {:?}",
                saved.topic_term.dim(),
                expected
            )));
        }
        if saved.training_distribution.ncols() != saved.config.n_topics {
            return Err(TopicError::ModelFit(format!(
                "saved training distribution has {} columns, expected {}",
                saved.training_distribution.ncols(),
                saved.config.n_topics
            )));
        }

        let mut modeler = TopicModeler::with_resources(saved.config, resources)?;
        modeler.set_state(FittedState {
            vocabulary,
            topic_term: saved.topic_term,
            training_distribution: saved.training_distribution,
            document_count: saved.document_count,
            fitted_at: saved.fitted_at,
        });
        Ok(modeler)
    }
}

/// Write a fitted model to `path`, creating parent directories as needed.
pub fn save_model(modeler: &TopicModeler, path: &Path) -> Result<()> {
    let saved = modeler.to_saved()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string(&saved)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write model to {}", path.display()))?;
    info!(path = %path.display(), topics = saved.config.n_topics, "Saved model");
    Ok(())
}

/// Load a model written by `save_model`, using the English text resources.
pub fn load_model(path: &Path) -> Result<TopicModeler> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model from {}", path.display()))?;
    let saved: SavedModel = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a valid model file", path.display()))?;
    info!(
        path = %path.display(),
        fitted_at = %saved.fitted_at,
        "Loaded model"
    );
    Ok(TopicModeler::from_saved(saved, TextResources::english())?)
}
