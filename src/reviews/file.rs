// Local file review source.
//
// Reads reviews exported to disk. Three layouts are accepted:
//   - a JSON array of review objects ({"review_text": ..., "score": ...})
//   - a JSON array of plain strings
//   - plain text, one review per non-blank line
// The identifier passed to fetch_reviews is the file path.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::models::Review;
use super::traits::ReviewSource;

/// A JSON array entry: either a bare string or a review object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReview {
    Text(String),
    Record(Review),
}

/// Reads reviews from local files.
#[derive(Debug, Clone, Default)]
pub struct FileReviewSource;

impl ReviewSource for FileReviewSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_reviews(&self, identifier: &str, limit: usize) -> Result<Vec<Review>> {
        let path = Path::new(identifier);
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reviews from {}", path.display()))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reviews".to_string());

        let mut reviews = parse_reviews(&contents)
            .with_context(|| format!("{} is not a valid review file", path.display()))?;
        reviews.truncate(limit);

        for (i, review) in reviews.iter_mut().enumerate() {
            if review.review_id.is_empty() {
                review.review_id = format!("{stem}_{i}");
            }
            if review.product_id.is_empty() {
                review.product_id = stem.clone();
            }
            if review.platform.is_empty() {
                review.platform = self.name().to_string();
            }
        }

        info!(
            path = %path.display(),
            reviews = reviews.len(),
            limit,
            "Loaded reviews"
        );
        Ok(reviews)
    }
}

/// Parse file contents in any of the accepted layouts.
pub fn parse_reviews(contents: &str) -> Result<Vec<Review>> {
    if contents.trim_start().starts_with('[') {
        let raw: Vec<RawReview> = serde_json::from_str(contents)?;
        return Ok(raw
            .into_iter()
            .map(|entry| match entry {
                RawReview::Text(text) => Review::from_text(String::new(), text),
                RawReview::Record(review) => review,
            })
            .collect());
    }

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Review::from_text(String::new(), line))
        .collect())
}
