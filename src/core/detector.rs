//! Stopword-based source language detection
//!
//! Scores are substring counts over the lower-cased text, so a stopword that
//! happens to sit inside an unrelated word still counts.

/// Returned for short input or when no stopword matches
pub const DEFAULT_LANG: &str = "en";

/// Stopwords per language. Declaration order breaks ties.
const STOPWORDS: &[(&str, &[&str])] = &[
    (
        "pt",
        &[
            "olá", "você", "não", "obrigado", "obrigada", "também", "então", "muito", "ção",
            "ões", "bom dia", "tudo bem",
        ],
    ),
    (
        "en",
        &[
            "the", "and", "hello", "you", "what", "with", "this", "thank", "please", "are",
        ],
    ),
    (
        "es",
        &[
            "hola", "gracias", "usted", "qué", "cómo", "por favor", "buenos", "muy", "ñ",
            "señor",
        ],
    ),
    (
        "fr",
        &[
            "bonjour", "merci", "je suis", "vous", "avec", "très", "être", "c'est", "oui",
            "beaucoup",
        ],
    ),
    (
        "de",
        &[
            "hallo", "danke", "bitte", "nicht", "ich bin", "guten", "sehr", "schön", "über",
            "ß",
        ],
    ),
];

/// Per-language stopword hit counts, in declaration order
pub fn score(text: &str) -> Vec<(&'static str, usize)> {
    let lowered = text.to_lowercase();
    STOPWORDS
        .iter()
        .map(|(lang, words)| {
            let hits = words.iter().filter(|word| lowered.contains(*word)).count();
            (*lang, hits)
        })
        .collect()
}

/// Detect the language of `text`
pub fn detect(text: &str) -> &'static str {
    if text.trim().chars().count() < 2 {
        return DEFAULT_LANG;
    }

    let mut best = DEFAULT_LANG;
    let mut best_score = 0;
    for (lang, hits) in score(text) {
        // strict comparison keeps the earlier language on ties
        if hits > best_score {
            best = lang;
            best_score = hits;
        }
    }
    best
}

/// Languages the detector can return
pub fn detectable_languages() -> impl Iterator<Item = &'static str> {
    STOPWORDS.iter().map(|(lang, _)| *lang)
}
