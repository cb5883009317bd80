//! Mood classification.
//!
//! Two classifiers share the [`Mood`] taxonomy but answer different
//! questions and keep separate rules:
//! - [`mood_of_movie`]: what a movie IS, from its genres and overview sentiment
//! - [`mood_of_query`]: what a USER WANTS, from keywords in free text
//!
//! Both are ordered rule lists evaluated top to bottom; the first match
//! wins, and a sentiment threshold ladder handles everything else.

use crate::sentiment::SentimentScorer;
use crate::tokenizer::overview_tokens;
use data_loader::Mood;
use std::sync::Arc;

// =============================================================================
// Movie rules
// =============================================================================

/// One step of the movie cascade
pub struct MovieRule {
    pub name: &'static str,
    pub mood: Mood,
    applies: fn(&[String], f64) -> bool,
}

fn has(genres: &[String], genre: &str) -> bool {
    genres.iter().any(|g| g == genre)
}

fn has_any(genres: &[String], wanted: &[&str]) -> bool {
    wanted.iter().any(|w| has(genres, w))
}

/// Priority order matters: horror beats drama, romcom beats happy.
pub static MOVIE_RULES: &[MovieRule] = &[
    MovieRule {
        name: "horror",
        mood: Mood::Horror,
        applies: |g, _| has(g, "horror"),
    },
    MovieRule {
        name: "mystery-crime-thriller",
        mood: Mood::IntenseMystery,
        applies: |g, _| has_any(g, &["mystery", "crime", "thriller"]),
    },
    MovieRule {
        name: "comedy-and-romance",
        mood: Mood::Romcom,
        applies: |g, _| has(g, "comedy") && has(g, "romance"),
    },
    MovieRule {
        name: "comedy-family-animation",
        mood: Mood::Happy,
        applies: |g, _| has_any(g, &["comedy", "family", "animation"]),
    },
    MovieRule {
        name: "negative-drama-romance-war",
        mood: Mood::Sad,
        applies: |g, score| score < -0.3 && has_any(g, &["drama", "romance", "war"]),
    },
    MovieRule {
        name: "drama-romance",
        mood: Mood::RomanticDramatic,
        applies: |g, _| has_any(g, &["drama", "romance"]),
    },
    MovieRule {
        name: "documentary-history",
        mood: Mood::ThoughtProvoking,
        applies: |g, _| has_any(g, &["documentary", "history"]),
    },
    MovieRule {
        name: "action-adventure",
        mood: Mood::ActionAdventure,
        applies: |g, _| has_any(g, &["action", "adventure"]),
    },
    MovieRule {
        name: "music-fantasy-scifi",
        mood: Mood::Escapist,
        applies: |g, _| has_any(g, &["music", "fantasy", "science fiction"]),
    },
];

/// First movie rule matching these genres and score
pub fn movie_rule_for(genres: &[String], sentiment: f64) -> Option<&'static MovieRule> {
    let lowered: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();
    MOVIE_RULES.iter().find(|rule| (rule.applies)(&lowered, sentiment))
}

/// Mood of a movie. Never produces `Relaxing` or `Drama`.
pub fn mood_of_movie(sentiment: f64, genres: &[String]) -> Mood {
    match movie_rule_for(genres, sentiment) {
        Some(rule) => rule.mood,
        None if sentiment <= -0.5 => Mood::Sad,
        None => Mood::Happy,
    }
}

// =============================================================================
// Query rules
// =============================================================================

/// One step of the query cascade: any keyword as a substring selects `mood`
pub struct QueryRule {
    pub name: &'static str,
    pub mood: Mood,
    pub keywords: &'static [&'static str],
}

pub static QUERY_RULES: &[QueryRule] = &[
    QueryRule {
        name: "emotional-distress",
        mood: Mood::Drama,
        keywords: &[
            "had a tough day", "tough day", "stress", "stressed", "exhausted", "tired", "drained",
            "burnt out", "burned out", "overwhelmed", "sad", "heartbroken", "heart broken",
            "breakup", "broke up", "lonely", "alone", "depressed",
        ],
    },
    QueryRule {
        name: "horror",
        mood: Mood::Horror,
        keywords: &[
            "horror", "scary", "spooky", "creepy", "gore", "gory", "slasher", "ghost", "zombie",
            "paranormal", "possession",
        ],
    },
    QueryRule {
        name: "mystery-thriller",
        mood: Mood::IntenseMystery,
        keywords: &[
            "mystery", "crime", "detective", "puzzle", "thriller", "thrilling", "suspense", "noir",
            "whodunit", "psychological", "twist", "investigation", "serial killer", "heist",
            "conspiracy",
        ],
    },
    QueryRule {
        name: "romcom",
        mood: Mood::Romcom,
        keywords: &[
            "romcom", "rom-com", "romantic comedy", "meet-cute", "date night", "banter", "cute rom",
            "feel-good romance", "light romance",
        ],
    },
    QueryRule {
        name: "romance",
        mood: Mood::RomanticDramatic,
        keywords: &["romantic", "love", "romance", "relationship", "heartfelt", "romantic drama"],
    },
    QueryRule {
        name: "action",
        mood: Mood::ActionAdventure,
        keywords: &[
            "action", "adventure", "fight", "battle", "chase", "spy", "espionage", "war",
            "martial arts", "car chase", "explosive",
        ],
    },
    QueryRule {
        name: "happy",
        mood: Mood::Happy,
        keywords: &[
            "happy", "joyful", "fun", "uplifting", "comedy", "lighthearted", "feel-good", "wholesome",
            "family-friendly", "light",
        ],
    },
    QueryRule {
        name: "documentary",
        mood: Mood::ThoughtProvoking,
        keywords: &[
            "documentary", "learn", "explore", "history", "biography", "biopic", "informative",
            "educational", "philosophical", "mind-bending", "political", "social issues", "true story",
        ],
    },
    QueryRule {
        name: "calm",
        mood: Mood::Relaxing,
        keywords: &[
            "chill", "relax", "calm", "peaceful", "cozy", "comfort", "soothing", "slow", "slice of life",
        ],
    },
    QueryRule {
        name: "scifi-fantasy",
        mood: Mood::Escapist,
        keywords: &[
            "fantasy", "sci-fi", "science fiction", "fiction", "space", "aliens", "superhero",
            "magical", "mythical", "space opera", "time travel",
        ],
    },
    QueryRule {
        name: "sad",
        mood: Mood::Drama,
        keywords: &["sad", "melodrama", "tragic", "weepie", "emotional", "poignant", "heartbreaking"],
    },
];

/// First query rule with a keyword contained in the lowercased text
pub fn query_rule_for(text: &str) -> Option<&'static QueryRule> {
    let text = text.to_lowercase();
    QUERY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| text.contains(kw)))
}

/// Mood a user is asking for. Never produces `Sad`.
pub fn mood_of_query(sentiment: f64, text: &str) -> Mood {
    if let Some(rule) = query_rule_for(text) {
        return rule.mood;
    }

    if sentiment >= 0.7 {
        Mood::Happy
    } else if sentiment >= 0.3 {
        Mood::Relaxing
    } else if sentiment <= -0.5 {
        Mood::Drama
    } else if sentiment <= -0.2 {
        Mood::IntenseMystery
    } else {
        Mood::Happy
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Pairs both cascades with a sentiment scorer
#[derive(Clone)]
pub struct MoodClassifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl MoodClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Movie mood from its overview and genres. The overview is scored in
    /// its lowercased, whitespace-normalized form.
    pub fn classify_movie(&self, overview: &str, genres: &[String]) -> Mood {
        let text = overview_tokens(overview).join(" ");
        mood_of_movie(self.scorer.compound(&text), genres)
    }

    /// Requested mood for free text
    pub fn classify_query(&self, text: &str) -> Mood {
        mood_of_query(self.scorer.compound(text), text)
    }
}
