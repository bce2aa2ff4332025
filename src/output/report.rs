// JSON topic report: topics plus per-review distributions in one document.
//
// Topic keyword lists first, then one entry per review with a `topic_<i>`
// probability map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reviews::models::Review;
use crate::topics::types::{DocumentTopics, TopicKeywords};

/// A complete topic-modeling result for a batch of reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicReport {
    /// Reviews that produced a distribution row
    pub n_documents: usize,
    pub n_topics: usize,
    pub topics: Vec<TopicKeywords>,
    pub document_topics: Vec<DocumentTopicEntry>,
}

/// One review's topic mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTopicEntry {
    /// Position of the review in the input list
    pub index: usize,
    pub review_id: String,
    pub document: String,
    /// `topic_<i>` -> probability
    pub topics: BTreeMap<String, f64>,
    pub dominant_topic: usize,
}

/// Assemble a report. `reviews` must be the list the distributions were computed from.
pub fn build_report(
    reviews: &[Review],
    topics: Vec<TopicKeywords>,
    distributions: &DocumentTopics,
) -> TopicReport {
    let document_topics = distributions
        .to_rows()
        .into_iter()
        .map(|row| {
            let review = reviews.get(row.index);
            DocumentTopicEntry {
                index: row.index,
                review_id: review.map(|r| r.review_id.clone()).unwrap_or_default(),
                document: review.map(|r| r.review_text.clone()).unwrap_or_default(),
                topics: row
                    .probabilities
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (format!("topic_{i}"), *p))
                    .collect(),
                dominant_topic: row.dominant_topic,
            }
        })
        .collect();

    TopicReport {
        n_documents: distributions.n_documents(),
        n_topics: distributions.n_topics(),
        topics,
        document_topics,
    }
}
