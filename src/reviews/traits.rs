// Review source trait: swap-ready abstraction over where reviews come from.
//
// Each concrete source (a local export file, a marketplace scraper) is its
// own type implementing this trait; callers compose whichever one they need.

use anyhow::Result;

use super::models::Review;

/// Trait for fetching reviews of a product.
pub trait ReviewSource {
    /// Short name of the source, used in logs and as the review platform.
    fn name(&self) -> &str;

    /// Fetch up to `limit` reviews for the product `identifier`.
    fn fetch_reviews(&self, identifier: &str, limit: usize) -> Result<Vec<Review>>;
}
