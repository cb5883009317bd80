//! Feature tokenizer: one bag-of-words tag string per movie.
//!
//! ## Algorithm
//! 1. Overview: lowercase, split on whitespace
//! 2. Genres, keywords, cast, director: lowercase and strip internal
//!    whitespace, so "Tom Cruise" becomes `tomcruise` and never collides
//!    with an unrelated "Tom"
//! 3. Concatenate in that order
//! 4. Stem every token with the English Snowball stemmer, join with spaces

use data_loader::NormalizedMovie;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::OnceLock;

static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Lowercased overview tokens, also the text fed to the sentiment scorer
pub fn overview_tokens(overview: &str) -> Vec<String> {
    overview.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Collapse a multi-word name into one lowercase token
pub fn name_token(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// Unstemmed tokens in tag order
pub fn tokenize(movie: &NormalizedMovie) -> Vec<String> {
    let names = movie
        .genres
        .iter()
        .chain(&movie.keywords)
        .chain(&movie.cast)
        .chain(&movie.director)
        .map(|name| name_token(name));

    overview_tokens(&movie.overview_text)
        .into_iter()
        .chain(names)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Stem a whitespace-separated text token by token
pub fn stem_text(text: &str) -> String {
    let stemmer = stemmer();
    text.to_lowercase()
        .split_whitespace()
        .map(|token| stemmer.stem(token).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The final stemmed tag string
pub fn tag_string(movie: &NormalizedMovie) -> String {
    stem_text(&tokenize(movie).join(" "))
}
