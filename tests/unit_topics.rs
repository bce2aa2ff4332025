// Unit tests for the topic modeler: fit, get_topics and transform.
//
// Covers the public contract end to end on small review corpora: output
// shapes, probability rows, seeded determinism, the error taxonomy and the
// degenerate cases (too many topics, blank and out-of-vocabulary inputs).

use std::collections::HashSet;

use reviewlens::topics::lda::LearningMethod;
use reviewlens::{ModelConfig, TopicError, TopicModeler};

/// Eight short product reviews touching batteries, screens and delivery.
const REVIEWS: [&str; 8] = [
    "The battery life is amazing and the battery charges quickly.",
    "Screen quality is excellent, bright screen with sharp colors.",
    "Delivery was fast and the packaging was perfect.",
    "Customer service was helpful and delivery arrived early.",
    "Battery drains fast, disappointed with battery performance.",
    "The screen cracked after a week, poor screen quality.",
    "Excellent customer service, quick delivery and careful packaging.",
    "Phone battery overheats while charging near the screen.",
];

fn fitted(n_topics: usize, seed: u64) -> TopicModeler {
    let mut modeler = TopicModeler::new(ModelConfig::new(n_topics).random_seed(seed)).unwrap();
    modeler.fit(&REVIEWS).unwrap();
    modeler
}

fn assert_probability_rows(matrix: &ndarray::Array2<f64>, tolerance: f64) {
    for (i, row) in matrix.rows().into_iter().enumerate() {
        assert!(row.iter().all(|p| *p >= 0.0), "row {i} has a negative entry");
        let sum: f64 = row.sum();
        assert!((sum - 1.0).abs() < tolerance, "row {i} sums to {sum}");
    }
}

// ============================================================
// Eight-review scenario
// ============================================================

#[test]
fn eight_reviews_fit_and_transform() {
    let modeler = fitted(2, 42);
    assert!(modeler.is_fitted());

    let distributions = modeler.transform(&REVIEWS).unwrap();
    assert_eq!(distributions.shape(), (8, 2));
    assert_eq!(distributions.source_indices(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_probability_rows(distributions.matrix(), 1e-2);
}

#[test]
fn eight_reviews_topics_have_exact_keyword_counts() {
    let modeler = fitted(2, 42);
    let vocabulary = modeler.vocabulary().unwrap();
    assert!(vocabulary.len() >= 5);

    let topics = modeler.get_topics(5).unwrap();
    assert_eq!(topics.len(), 2);
    for (i, topic) in topics.iter().enumerate() {
        assert_eq!(topic.topic_id, i);
        assert_eq!(topic.keywords.len(), 5);
        let unique: HashSet<&String> = topic.keywords.iter().collect();
        assert_eq!(unique.len(), 5, "duplicate keywords in topic {i}");
        for keyword in &topic.keywords {
            assert!(vocabulary.contains(keyword), "{keyword} not in vocabulary");
        }
    }
}

#[test]
fn eight_reviews_vocabulary_has_review_terms() {
    let modeler = fitted(2, 42);
    let vocabulary = modeler.vocabulary().unwrap();
    for term in ["battery", "screen", "delivery"] {
        assert!(vocabulary.contains(term), "{term} missing from vocabulary");
    }
}

#[test]
fn topic_weights_are_shares_of_total_mass() {
    let topics = fitted(3, 42).get_topics(3).unwrap();
    let total: f64 = topics.iter().map(|t| t.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(topics.iter().all(|t| t.weight > 0.0));
}

#[test]
fn keywords_are_ordered_by_descending_weight() {
    let modeler = fitted(2, 42);
    let weights = modeler.topic_term_weights().unwrap();
    let vocabulary = modeler.vocabulary().unwrap();
    for topic in modeler.get_topics(5).unwrap() {
        let scores: Vec<f64> = topic
            .keywords
            .iter()
            .map(|k| weights[[topic.topic_id, vocabulary.index_of(k).unwrap()]])
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
    }
}

#[test]
fn training_distribution_matches_shape() {
    let modeler = fitted(2, 42);
    let training = modeler.training_distribution().unwrap();
    assert_eq!(training.dim(), (8, 2));
    assert_probability_rows(training, 1e-2);
}

#[test]
fn topic_term_weights_rows_are_positive() {
    let modeler = fitted(4, 42);
    let weights = modeler.topic_term_weights().unwrap();
    assert_eq!(weights.nrows(), 4);
    for row in weights.rows() {
        assert!(row.sum() > 0.0);
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn same_seed_same_model() {
    let a = fitted(2, 42);
    let b = fitted(2, 42);
    assert_eq!(a.topic_term_weights().unwrap(), b.topic_term_weights().unwrap());
    assert_eq!(
        a.transform(&REVIEWS).unwrap().matrix(),
        b.transform(&REVIEWS).unwrap().matrix()
    );
    assert_eq!(a.get_topics(5).unwrap(), b.get_topics(5).unwrap());
}

#[test]
fn thread_count_does_not_change_the_model() {
    let fit_with_threads = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| {
            let modeler = fitted(3, 42);
            let weights = modeler.topic_term_weights().unwrap().clone();
            let distribution = modeler.transform(&REVIEWS).unwrap();
            (weights, distribution)
        })
    };

    let (single_weights, single_distribution) = fit_with_threads(1);
    let (many_weights, many_distribution) = fit_with_threads(8);
    assert_eq!(single_weights, many_weights);
    assert_eq!(single_distribution, many_distribution);
}

#[test]
fn same_seed_same_model_batch_learning() {
    let config = ModelConfig::new(3).learning_method(LearningMethod::Batch);
    let mut a = TopicModeler::new(config.clone()).unwrap();
    let mut b = TopicModeler::new(config).unwrap();
    a.fit(&REVIEWS).unwrap();
    b.fit(&REVIEWS).unwrap();
    assert_eq!(a.topic_term_weights().unwrap(), b.topic_term_weights().unwrap());
    assert_probability_rows(a.transform(&REVIEWS).unwrap().matrix(), 1e-2);
}

#[test]
fn different_seeds_change_keywords() {
    // Across a small sweep at least one seed must give a different ranking
    let rankings: HashSet<Vec<Vec<String>>> = (1..=8)
        .map(|seed| {
            fitted(2, seed)
                .get_topics(5)
                .unwrap()
                .into_iter()
                .map(|t| t.keywords)
                .collect()
        })
        .collect();
    assert!(rankings.len() > 1, "every seed produced identical keywords");
}

#[test]
fn refit_replaces_previous_model() {
    let mut modeler = fitted(2, 42);
    modeler
        .fit(&["cable charger cable", "charger cable adapter", "adapter charger"])
        .unwrap();
    let vocabulary = modeler.vocabulary().unwrap();
    assert!(!vocabulary.contains("battery"));
    assert!(vocabulary.contains("cable"));
    // In every document, so above the 0.95 ceiling
    assert!(!vocabulary.contains("charger"));
}

// ============================================================
// Transform edge cases
// ============================================================

#[test]
fn out_of_vocabulary_document_is_uniform() {
    let modeler = fitted(2, 42);
    let distributions = modeler.transform(&["xyzabc qwerty"]).unwrap();
    assert_eq!(distributions.shape(), (1, 2));
    for p in distributions.row(0) {
        assert!((p - 0.5).abs() < 1e-9, "expected uniform row, got {p}");
    }
}

#[test]
fn blank_documents_are_dropped_and_indexed() {
    let modeler = fitted(2, 42);
    let distributions = modeler
        .transform(&["battery died", "", "   ", "screen cracked"])
        .unwrap();
    assert_eq!(distributions.shape(), (2, 2));
    assert_eq!(distributions.source_indices(), &[0, 3]);
    assert_probability_rows(distributions.matrix(), 1e-2);
}

#[test]
fn all_blank_transform_is_zero_rows() {
    let modeler = fitted(3, 42);
    let distributions = modeler.transform(&["", "   ", "\n"]).unwrap();
    assert_eq!(distributions.shape(), (0, 3));
    assert!(distributions.is_empty());
}

#[test]
fn transform_is_repeatable() {
    let modeler = fitted(2, 42);
    let first = modeler.transform(&REVIEWS[..3]).unwrap();
    let second = modeler.transform(&REVIEWS[..3]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dominant_topics_are_valid_ids() {
    let modeler = fitted(3, 42);
    let distributions = modeler.transform(&REVIEWS).unwrap();
    let dominant = distributions.dominant_topics();
    assert_eq!(dominant.len(), 8);
    assert!(dominant.iter().all(|t| *t < 3));

    let prevalence = distributions.topic_prevalence();
    assert_eq!(prevalence.len(), 3);
    assert!((prevalence.iter().sum::<f64>() - 1.0).abs() < 1e-2);
}

// ============================================================
// More topics than documents
// ============================================================

#[test]
fn fifty_topics_on_eight_documents_succeeds() {
    let modeler = fitted(50, 42);
    let topics = modeler.get_topics(3).unwrap();
    assert_eq!(topics.len(), 50);
    assert!(topics.iter().all(|t| t.keywords.len() == 3));

    let distributions = modeler.transform(&REVIEWS).unwrap();
    assert_eq!(distributions.shape(), (8, 50));
    assert_probability_rows(distributions.matrix(), 1e-2);
}

#[test]
fn n_words_beyond_vocabulary_returns_whole_vocabulary() {
    let modeler = fitted(2, 42);
    let size = modeler.vocabulary().unwrap().len();
    for topic in modeler.get_topics(size + 50).unwrap() {
        assert_eq!(topic.keywords.len(), size);
    }
}

// ============================================================
// Errors
// ============================================================

#[test]
fn get_topics_before_fit_is_not_fitted() {
    let modeler = TopicModeler::new(ModelConfig::new(2)).unwrap();
    assert!(!modeler.is_fitted());
    assert_eq!(modeler.get_topics(5).unwrap_err(), TopicError::NotFitted);
}

#[test]
fn transform_before_fit_is_not_fitted() {
    let modeler = TopicModeler::new(ModelConfig::new(2)).unwrap();
    assert_eq!(
        modeler.transform(&["battery"]).unwrap_err(),
        TopicError::NotFitted
    );
    assert_eq!(modeler.vocabulary().unwrap_err(), TopicError::NotFitted);
}

#[test]
fn fit_empty_list_is_empty_input() {
    let mut modeler = TopicModeler::new(ModelConfig::new(2)).unwrap();
    let empty: [&str; 0] = [];
    assert_eq!(modeler.fit(&empty).unwrap_err(), TopicError::EmptyInput);
}

#[test]
fn fit_blank_documents_is_empty_vocabulary() {
    let mut modeler = TopicModeler::new(ModelConfig::new(2)).unwrap();
    assert!(matches!(
        modeler.fit(&["", "   "]),
        Err(TopicError::EmptyVocabulary { .. })
    ));
    assert!(!modeler.is_fitted());
}

#[test]
fn fit_without_shared_terms_is_empty_vocabulary() {
    // Every term appears in a single document, so min_df = 2 removes all of them
    let mut modeler = TopicModeler::new(ModelConfig::new(2)).unwrap();
    assert_eq!(
        modeler.fit(&["battery", "screen", "delivery"]).unwrap_err(),
        TopicError::EmptyVocabulary { documents: 3 }
    );
}

#[test]
fn transform_empty_list_is_empty_input() {
    let modeler = fitted(2, 42);
    let empty: [&str; 0] = [];
    assert_eq!(modeler.transform(&empty).unwrap_err(), TopicError::EmptyInput);
}

#[test]
fn zero_n_words_is_invalid() {
    let modeler = fitted(2, 42);
    assert!(matches!(
        modeler.get_topics(0),
        Err(TopicError::InvalidConfiguration(_))
    ));
}

#[test]
fn zero_topics_is_invalid() {
    assert!(matches!(
        TopicModeler::new(ModelConfig::new(0)),
        Err(TopicError::InvalidConfiguration(_))
    ));
}

#[test]
fn zero_iterations_is_invalid() {
    assert!(matches!(
        TopicModeler::new(ModelConfig::new(2).max_iterations(0)),
        Err(TopicError::InvalidConfiguration(_))
    ));
}
