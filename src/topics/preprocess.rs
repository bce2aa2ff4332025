// Text cleaning for topic modeling.
//
// Turns raw review bodies into space-separated token strings: lowercase,
// letters only, no short tokens, no stop words, lemmatized. The stop-word set
// and lemmatizer live in TextResources, which is built once and handed in,
// so nothing here touches process-wide state.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::lemma::NounLemmatizer;
use super::traits::Lemmatizer;

/// Tokens of this many characters or fewer are discarded.
pub const MAX_DISCARDED_TOKEN_LEN: usize = 2;

/// Language resources used by the preprocessor.
#[derive(Clone)]
pub struct TextResources {
    stop_words: HashSet<String>,
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl TextResources {
    /// English stop words from the stop-words crate plus the built-in noun lemmatizer.
    pub fn english() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::new(stop_words, NounLemmatizer::default())
    }

    /// Build resources from a custom stop-word list and lemmatizer.
    pub fn new<I, S, L>(stop_words: I, lemmatizer: L) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: Lemmatizer + 'static,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            lemmatizer: Arc::new(lemmatizer),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    pub fn lemmatizer(&self) -> &dyn Lemmatizer {
        self.lemmatizer.as_ref()
    }
}

impl fmt::Debug for TextResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextResources")
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

/// Applies the cleaning pipeline to raw documents.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    resources: TextResources,
    non_letters: Regex,
}

impl TextPreprocessor {
    pub fn new(resources: TextResources) -> Self {
        Self {
            resources,
            // Anything that is not an ASCII letter or whitespace goes
            non_letters: Regex::new(r"[^a-zA-Z\s]").expect("static pattern is valid"),
        }
    }

    pub fn resources(&self) -> &TextResources {
        &self.resources
    }

    /// Clean a batch of documents.
    ///
    /// Empty and whitespace-only inputs are dropped, so the output can be
    /// shorter than the input. A document whose every token gets filtered
    /// still produces an (empty) entry.
    pub fn process<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        self.process_indexed(texts)
            .into_iter()
            .map(|(_, cleaned)| cleaned)
            .collect()
    }

    /// Like `process`, but each cleaned document carries its input index.
    pub fn process_indexed<S: AsRef<str>>(&self, texts: &[S]) -> Vec<(usize, String)> {
        texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.as_ref().trim().is_empty())
            .map(|(i, text)| (i, self.clean(text.as_ref())))
            .collect()
    }

    /// Clean a single document into space-separated lemmas.
    pub fn clean(&self, text: &str) -> String {
        // The pattern's \s is ASCII-only; map Unicode spaces (NBSP, em space)
        // to ' ' first so they still separate words.
        let lowered: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        let letters_only = self.non_letters.replace_all(&lowered, "");

        let tokens: Vec<String> = letters_only
            .split_whitespace()
            .filter(|token| token.len() > MAX_DISCARDED_TOKEN_LEN)
            .filter(|token| !self.resources.is_stop_word(token))
            .map(|token| self.resources.lemmatizer().lemmatize(token).into_owned())
            .collect();

        tokens.join(" ")
    }
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(TextResources::english())
    }
}
