// Rule-based noun lemmatizer.
//
// Follows the WordNet noun detachment rules (-ies -> -y, -ches -> -ch, ...)
// plus an exception table for irregular plurals. There is no dictionary to
// validate candidates against, so the rules are guarded: words that only look
// plural (status, analysis, glass) are left alone.

use std::borrow::Cow;
use std::collections::HashMap;

use super::traits::Lemmatizer;

/// Irregular plurals the suffix rules would get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("wolves", "wolf"),
    ("calves", "calf"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("heroes", "hero"),
    ("echoes", "echo"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("lenses", "lens"),
    ("biases", "bias"),
    ("aliases", "alias"),
    ("atlases", "atlas"),
    ("canvases", "canvas"),
    ("bonuses", "bonus"),
    ("viruses", "virus"),
    ("statuses", "status"),
    ("campuses", "campus"),
    ("focuses", "focus"),
    ("minuses", "minus"),
];

/// Singulars ending in -ie or -che whose plural just adds "s". The -ies and
/// -ches rules would otherwise turn "movies" into "movy".
const PLAIN_S_PLURALS: &[&str] = &[
    "movie", "cookie", "calorie", "pie", "tie", "lie", "zombie", "selfie", "hoodie",
    "rookie", "brownie", "smoothie", "freebie", "goodie", "veggie", "newbie", "genie",
    "prairie", "collie", "birdie", "boogie", "eyrie", "headache", "ache", "niche",
    "cache", "avalanche", "moustache", "mustache", "cliche", "quiche", "creche",
];

/// Words ending in "s" that are not plurals.
const NOT_PLURAL: &[&str] = &[
    "always", "perhaps", "towards", "afterwards", "besides", "news", "series", "species",
    "lens", "gas", "bias", "atlas", "canvas", "chaos", "christmas", "pants", "jeans",
    "scissors", "headphones", "earphones", "glasses", "sales", "thanks", "yes",
];

/// Suffixes that mark singular words ending in "s".
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Noun-form lemmatizer driven by suffix rules and an exception table.
#[derive(Debug, Clone)]
pub struct NounLemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
}

impl Default for NounLemmatizer {
    fn default() -> Self {
        Self {
            exceptions: IRREGULAR_NOUNS.iter().copied().collect(),
        }
    }
}

impl Lemmatizer for NounLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(base) = self.exceptions.get(token) {
            return Cow::Borrowed(*base);
        }
        if !token.ends_with('s') || NOT_PLURAL.contains(&token) {
            return Cow::Borrowed(token);
        }
        if SINGULAR_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
            return Cow::Borrowed(token);
        }
        if let Some(stem) = token.strip_suffix('s') {
            if PLAIN_S_PLURALS.contains(&stem) {
                return Cow::Borrowed(stem);
            }
        }

        // (suffix, replacement) in priority order. A rule only applies when
        // the resulting lemma keeps at least 3 letters.
        const RULES: &[(&str, &str)] = &[
            ("ies", "y"),
            ("sses", "ss"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("xes", "x"),
            ("zzes", "zz"),
            ("s", ""),
        ];

        for (suffix, replacement) in RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.len() + replacement.len() >= 3 {
                    return Cow::Owned(format!("{stem}{replacement}"));
                }
            }
        }

        Cow::Borrowed(token)
    }
}
