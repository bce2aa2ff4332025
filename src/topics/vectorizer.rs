// Bag-of-words vectorization.
//
// Builds the vocabulary from cleaned documents (document-frequency filtering
// plus a cap on the number of kept terms) and turns documents into sparse
// term-count rows. Vocabulary order is first-seen order across the corpus,
// which is also the tie-break order for topic keywords.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TopicError};

/// Vocabulary filtering thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Terms in fewer documents than this are dropped
    pub min_document_frequency: usize,
    /// Terms in more than this fraction of documents are dropped
    pub max_document_frequency_ratio: f64,
    /// Cap on the number of kept terms (most frequent win)
    pub max_vocabulary_size: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_document_frequency: 2,
            max_document_frequency_ratio: 0.95,
            max_vocabulary_size: 1000,
        }
    }
}

/// An ordered, deduplicated set of terms with index lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from terms in order. Later duplicates are ignored.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for term in terms {
            let term = term.into();
            if !vocab.index.contains_key(&term) {
                vocab.index.insert(term.clone(), vocab.terms.len());
                vocab.terms.push(term);
            }
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}

/// Sparse document-term count matrix.
///
/// Each row lists `(term_index, count)` pairs with ascending term indices and
/// non-zero counts. Rows for documents with no vocabulary terms are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTermMatrix {
    rows: Vec<Vec<(usize, u32)>>,
    n_terms: usize,
}

impl DocumentTermMatrix {
    /// Build from sparse rows. Entries are sorted and zero counts dropped.
    pub fn from_rows(rows: Vec<Vec<(usize, u32)>>, n_terms: usize) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.retain(|&(term, count)| count > 0 && term < n_terms);
                row.sort_unstable_by_key(|&(term, _)| term);
                row
            })
            .collect();
        Self { rows, n_terms }
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_terms)
    }

    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    pub fn rows(&self) -> &[Vec<(usize, u32)>] {
        &self.rows
    }

    pub fn get(&self, doc: usize, term: usize) -> u32 {
        self.rows[doc]
            .binary_search_by_key(&term, |&(t, _)| t)
            .map(|pos| self.rows[doc][pos].1)
            .unwrap_or(0)
    }

    /// Total number of tokens counted in the matrix.
    pub fn total_count(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|&(_, c)| c as u64))
            .sum()
    }
}

/// Learns a vocabulary and produces count matrices against it.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    config: VectorizerConfig,
}

/// Per-term corpus statistics gathered during fitting.
struct TermStats {
    first_seen: usize,
    document_frequency: usize,
    total_count: u64,
}

impl CountVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Learn the vocabulary from cleaned documents and vectorize them.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<(Vocabulary, DocumentTermMatrix)> {
        let vocabulary = self.fit(documents)?;
        let dtm = transform(&vocabulary, documents);
        Ok((vocabulary, dtm))
    }

    /// Learn the vocabulary from cleaned (space-separated) documents.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vocabulary> {
        let n_docs = documents.len();

        let mut stats: HashMap<&str, TermStats> = HashMap::new();
        for doc in documents {
            let mut seen_in_doc: HashSet<&str> = HashSet::new();
            for token in doc.as_ref().split_whitespace() {
                let next_id = stats.len();
                let entry = stats.entry(token).or_insert(TermStats {
                    first_seen: next_id,
                    document_frequency: 0,
                    total_count: 0,
                });
                entry.total_count += 1;
                if seen_in_doc.insert(token) {
                    entry.document_frequency += 1;
                }
            }
        }

        let candidate_count = stats.len();
        let max_doc_count = self.config.max_document_frequency_ratio * n_docs as f64;

        let mut kept: Vec<(&str, &TermStats)> = stats
            .iter()
            .filter(|(_, s)| {
                s.document_frequency >= self.config.min_document_frequency
                    && s.document_frequency as f64 <= max_doc_count
            })
            .map(|(term, s)| (*term, s))
            .collect();

        if kept.is_empty() {
            return Err(TopicError::EmptyVocabulary { documents: n_docs });
        }

        // Most frequent first, first-seen order among equals
        kept.sort_by(|a, b| {
            b.1.total_count
                .cmp(&a.1.total_count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        kept.truncate(self.config.max_vocabulary_size);

        // Store the survivors in first-seen order
        kept.sort_by_key(|(_, s)| s.first_seen);
        let vocabulary = Vocabulary::from_terms(kept.iter().map(|(term, _)| *term));

        info!(
            documents = n_docs,
            candidates = candidate_count,
            vocabulary = vocabulary.len(),
            "Built vocabulary"
        );

        Ok(vocabulary)
    }
}

/// Count vocabulary terms in cleaned documents. Unknown terms are ignored.
pub fn transform<S: AsRef<str>>(vocabulary: &Vocabulary, documents: &[S]) -> DocumentTermMatrix {
    let rows = documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<usize, u32> = HashMap::new();
            for token in doc.as_ref().split_whitespace() {
                if let Some(idx) = vocabulary.index_of(token) {
                    *counts.entry(idx).or_insert(0) += 1;
                }
            }
            counts.into_iter().collect()
        })
        .collect();

    DocumentTermMatrix::from_rows(rows, vocabulary.len())
}
