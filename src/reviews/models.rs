// Review records as they flow from a source into the topic modeler.

use serde::{Deserialize, Serialize};

/// A single product review.
///
/// Every field except the text is optional in source data and defaults when
/// missing, so a bare `{"review_text": "..."}` object is a valid review.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub review_id: String,
    /// The review body
    #[serde(alias = "text", alias = "body")]
    pub review_text: String,
    /// Star rating, 0.0 when unknown
    #[serde(alias = "rating")]
    pub score: f64,
    #[serde(alias = "reviewer_name")]
    pub user_name: String,
    #[serde(alias = "review_date")]
    pub date: String,
    #[serde(alias = "review_title")]
    pub title: String,
    pub platform: String,
    pub product_id: String,
    pub verified_purchase: bool,
}

impl Review {
    /// A review with only an id and text.
    pub fn from_text(review_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            review_id: review_id.into(),
            review_text: text.into(),
            ..Default::default()
        }
    }

    /// True when the review body has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.review_text.trim().is_empty()
    }
}

/// Review bodies in order, ready for `TopicModeler::fit`.
pub fn review_texts(reviews: &[Review]) -> Vec<String> {
    reviews.iter().map(|r| r.review_text.clone()).collect()
}
