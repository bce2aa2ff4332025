// Value types returned by the topic modeler.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// The top keywords of one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeywords {
    pub topic_id: usize,
    /// Highest-weight terms first
    pub keywords: Vec<String>,
    /// Share of the total topic-term mass held by this topic (all topics sum to 1.0)
    pub weight: f64,
}

impl TopicKeywords {
    /// Short label built from the first three keywords.
    pub fn label(&self) -> String {
        let words: Vec<&str> = self.keywords.iter().take(3).map(String::as_str).collect();
        words.join(" / ")
    }
}

/// Document-topic distributions for a batch of documents.
///
/// Empty and whitespace-only inputs are dropped before inference, so rows do
/// not line up with the inputs one-to-one. `source_indices[i]` is the input
/// position that produced row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTopics {
    distribution: Array2<f64>,
    source_indices: Vec<usize>,
}

/// One document's row, for serialization and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDistributionRow {
    /// Position of the document in the input list
    pub index: usize,
    pub probabilities: Vec<f64>,
    pub dominant_topic: usize,
}

impl DocumentTopics {
    pub fn new(distribution: Array2<f64>, source_indices: Vec<usize>) -> Self {
        debug_assert_eq!(distribution.nrows(), source_indices.len());
        Self {
            distribution,
            source_indices,
        }
    }

    /// (documents, topics)
    pub fn shape(&self) -> (usize, usize) {
        self.distribution.dim()
    }

    pub fn n_documents(&self) -> usize {
        self.distribution.nrows()
    }

    pub fn n_topics(&self) -> usize {
        self.distribution.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.distribution.nrows() == 0
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.distribution
    }

    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    pub fn row(&self, doc: usize) -> Vec<f64> {
        self.distribution.row(doc).to_vec()
    }

    /// Highest-probability topic per row; ties go to the lower topic id.
    pub fn dominant_topics(&self) -> Vec<usize> {
        self.distribution
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (topic, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = topic;
                    }
                }
                best
            })
            .collect()
    }

    /// Mean probability of each topic across all rows.
    pub fn topic_prevalence(&self) -> Vec<f64> {
        if self.is_empty() {
            return vec![0.0; self.n_topics()];
        }
        self.distribution
            .mean_axis(ndarray::Axis(0))
            .map(|m| m.to_vec())
            .unwrap_or_default()
    }

    pub fn to_rows(&self) -> Vec<TopicDistributionRow> {
        let dominant = self.dominant_topics();
        self.source_indices
            .iter()
            .enumerate()
            .map(|(row, &index)| TopicDistributionRow {
                index,
                probabilities: self.row(row),
                dominant_topic: dominant[row],
            })
            .collect()
    }
}
