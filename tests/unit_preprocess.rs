// Unit tests for text preprocessing.
//
// Exact-token assertions use a small injected stop-word list so they don't
// depend on the contents of the bundled English list. Tests that use the
// English resources only assert structural properties.

use std::borrow::Cow;

use reviewlens::topics::lemma::NounLemmatizer;
use reviewlens::topics::preprocess::{TextPreprocessor, TextResources, MAX_DISCARDED_TOKEN_LEN};
use reviewlens::topics::traits::Lemmatizer;

fn preprocessor(stop_words: &[&str]) -> TextPreprocessor {
    TextPreprocessor::new(TextResources::new(
        stop_words.iter().copied(),
        NounLemmatizer::default(),
    ))
}

/// Leaves every token alone, so cleaning steps can be checked in isolation.
struct Identity;

impl Lemmatizer for Identity {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

/// Uppercases tokens, so it's visible that the lemmatizer actually ran.
struct Shout;

impl Lemmatizer for Shout {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Owned(token.to_uppercase())
    }
}

// ============================================================
// clean: single-document pipeline
// ============================================================

#[test]
fn clean_lowercases_and_strips_non_letters() {
    let p = preprocessor(&[]);
    assert_eq!(p.clean("Great SCREEN!!! 10/10, would buy."), "great screen would buy");
}

#[test]
fn clean_removes_digits_inside_words() {
    let p = preprocessor(&[]);
    // "usb3" becomes "usb" once the digit goes
    assert_eq!(p.clean("usb3 cable"), "usb cable");
}

#[test]
fn clean_drops_short_tokens() {
    let p = preprocessor(&[]);
    let cleaned = p.clean("it is ok but the fit was bad");
    for token in cleaned.split_whitespace() {
        assert!(token.len() > MAX_DISCARDED_TOKEN_LEN, "short token kept: {token}");
    }
    assert_eq!(cleaned, "but the fit was bad");
}

#[test]
fn clean_drops_stop_words() {
    let p = preprocessor(&["the", "was", "but"]);
    assert_eq!(p.clean("the fit was bad but cheap"), "fit bad cheap");
}

#[test]
fn clean_stop_words_match_after_lowercasing() {
    let p = preprocessor(&["THE"]);
    assert_eq!(p.clean("The charger"), "charger");
}

#[test]
fn clean_lemmatizes_plurals() {
    let p = preprocessor(&[]);
    assert_eq!(p.clean("Batteries and boxes arrived"), "battery and box arrived");
}

#[test]
fn clean_collapses_whitespace() {
    let p = preprocessor(&[]);
    assert_eq!(p.clean("  screen \t\n  cable  "), "screen cable");
}

#[test]
fn clean_unicode_whitespace_separates_words() {
    let p = preprocessor(&[]);
    assert_eq!(
        p.clean("great\u{a0}battery screen\u{2003}quality"),
        "great battery screen quality"
    );
    // Narrow no-break space and ideographic space
    assert_eq!(p.clean("fast\u{202f}delivery\u{3000}cable"), "fast delivery cable");
}

#[test]
fn clean_all_filtered_is_empty_string() {
    let p = preprocessor(&["nothing"]);
    assert_eq!(p.clean("a 42 is nothing !"), "");
}

#[test]
fn clean_uses_injected_lemmatizer() {
    let p = TextPreprocessor::new(TextResources::new(["the"], Shout));
    assert_eq!(p.clean("the screen"), "SCREEN");
}

#[test]
fn clean_with_identity_lemmatizer_keeps_plurals() {
    let p = TextPreprocessor::new(TextResources::new(Vec::<String>::new(), Identity));
    assert_eq!(p.clean("batteries boxes"), "batteries boxes");
}

// ============================================================
// process: batches and dropped inputs
// ============================================================

#[test]
fn process_drops_empty_and_whitespace_documents() {
    let p = preprocessor(&[]);
    let out = p.process(&["real review", "", "   ", "\t\n", "another one"]);
    assert_eq!(out, vec!["real review".to_string(), "another one".to_string()]);
}

#[test]
fn process_keeps_fully_filtered_documents_as_empty_strings() {
    let p = preprocessor(&[]);
    let out = p.process(&["screen cable", "ok", "12 34"]);
    assert_eq!(out.len(), 3);
    assert_eq!(out[1], "");
    assert_eq!(out[2], "");
}

#[test]
fn process_indexed_reports_source_positions() {
    let p = preprocessor(&[]);
    let out = p.process_indexed(&["", "screen", "  ", "cable"]);
    let indices: Vec<usize> = out.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![1, 3]);
    assert_eq!(out[0].1, "screen");
}

#[test]
fn process_empty_batch() {
    let p = preprocessor(&[]);
    let empty: [&str; 0] = [];
    assert!(p.process(&empty).is_empty());
}

#[test]
fn process_accepts_owned_strings() {
    let p = preprocessor(&[]);
    let docs = vec![String::from("Cables"), String::from("Chargers")];
    assert_eq!(p.process(&docs), vec!["cable".to_string(), "charger".to_string()]);
}

// ============================================================
// English resources
// ============================================================

#[test]
fn english_resources_have_common_stop_words() {
    let resources = TextResources::english();
    assert!(resources.stop_word_count() > 100);
    assert!(resources.is_stop_word("the"));
    assert!(resources.is_stop_word("and"));
    assert!(!resources.is_stop_word("battery"));
}

#[test]
fn english_preprocessor_output_is_clean() {
    let p = TextPreprocessor::default();
    let out = p.process(&["The Battery died after 2 days... Terrible batteries!"]);
    assert_eq!(out.len(), 1);
    let tokens: Vec<&str> = out[0].split_whitespace().collect();
    assert!(tokens.contains(&"battery"));
    assert!(!tokens.contains(&"the"));
    for token in tokens {
        assert!(token.len() > MAX_DISCARDED_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_lowercase()));
    }
}

#[test]
fn resources_debug_does_not_dump_word_list() {
    let resources = TextResources::new(["alpha", "beta"], NounLemmatizer::default());
    let debug = format!("{resources:?}");
    assert!(debug.contains("TextResources"));
    assert!(!debug.contains("alpha"));
}
