// Colored terminal output for topics and review distributions.
//
// This module handles all terminal-specific formatting: colors, bars, tables.
// The main.rs command handlers delegate here.

use colored::Colorize;

use crate::config::Config;
use crate::reviews::models::Review;
use crate::topics::types::{DocumentTopics, TopicKeywords};

const BAR_WIDTH: usize = 20;

/// Display topics as a weighted bar chart with their keywords.
pub fn display_topics(topics: &[TopicKeywords], document_count: usize) {
    println!(
        "\n{}",
        format!(
            "=== {} Topics (from {} reviews) ===",
            topics.len(),
            document_count
        )
        .bold()
    );
    println!();

    for topic in topics {
        println!(
            "  {:>2}. {:<40} {} {:.2}",
            topic.topic_id,
            topic.label().bold(),
            weight_bar(topic.weight),
            topic.weight
        );
        println!("      Keywords: {}", topic.keywords.join(", ").dimmed());
        println!();
    }
}

/// Display each review's dominant topic, then the corpus-wide topic mix.
pub fn display_distributions(
    reviews: &[Review],
    topics: &[TopicKeywords],
    distributions: &DocumentTopics,
) {
    if distributions.is_empty() {
        println!("No reviews had any text left after preprocessing.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Review Topics ({} reviews) ===", distributions.n_documents()).bold()
    );
    println!();
    println!(
        "  {:>5}  {:>5}  {:>6}  {}",
        "Row".dimmed(),
        "Topic".dimmed(),
        "Prob".dimmed(),
        "Review".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for row in distributions.to_rows() {
        let text = reviews
            .get(row.index)
            .map(|r| r.review_text.as_str())
            .unwrap_or("");
        let prob = row.probabilities[row.dominant_topic];
        println!(
            "  {:>5}  {:>5}  {}  {}",
            row.index,
            row.dominant_topic,
            colorize_probability(prob),
            super::truncate_chars(text, 60).dimmed()
        );
    }

    println!();
    println!("  {}", "Topic prevalence:".bold());
    for (topic_id, share) in distributions.topic_prevalence().iter().enumerate() {
        let label = topics
            .iter()
            .find(|t| t.topic_id == topic_id)
            .map(TopicKeywords::label)
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<40} {} {:.2}",
            topic_id,
            label,
            weight_bar(*share),
            share
        );
    }

    let dropped = reviews.len().saturating_sub(distributions.n_documents());
    if dropped > 0 {
        println!(
            "\n  {} {} blank reviews skipped",
            "~".yellow(),
            dropped
        );
    }
}

/// Print the effective configuration.
pub fn display_config(config: &Config) {
    println!("\n{}", "=== Configuration ===".bold());
    println!("  Topics:               {}", config.n_topics);
    println!("  Keywords per topic:   {}", config.top_words);
    println!("  Random seed:          {}", config.random_seed);
    println!("  Inference passes:     {}", config.max_iterations);
    println!("  Learning method:      {:?}", config.learning_method);
    println!("  Min document freq:    {}", config.min_document_frequency);
    println!("  Max document ratio:   {}", config.max_document_frequency_ratio);
    println!("  Max vocabulary size:  {}", config.max_vocabulary_size);
    println!("  Max reviews/source:   {}", config.max_reviews);
    println!("  Model path:           {}", config.model_path.display());
}

/// Build a fixed-width bar colored by weight.
fn weight_bar(weight: f64) -> colored::ColoredString {
    let filled = ((weight * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

    if weight >= 0.25 {
        bar.bright_green()
    } else if weight >= 0.10 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}

/// Colorize a topic probability.
fn colorize_probability(prob: f64) -> colored::ColoredString {
    let text = format!("{prob:>6.2}");
    if prob >= 0.75 {
        text.green().bold()
    } else if prob >= 0.5 {
        text.yellow()
    } else {
        text.dimmed()
    }
}
