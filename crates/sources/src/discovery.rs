//! Discovery Source - browsing the catalog without a query movie
//!
//! Strategies:
//! - Mood: strict genre rules for a few moods, the movie's own mood label otherwise
//! - Category: mood names plus a handful of genre-style categories
//! - Genre and person: exact, case-insensitive matches
//! - Top rated: well-voted movies only
//! - Search suggestions: title substring matches
//!
//! Every browse list keeps only movies with enough votes and is ordered by
//! vote average, then vote count, both descending.

use data_loader::{Catalog, Mood, MovieId, MovieRecord, PersonRole, normalize_title};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How a browse request selects movies
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// At least one of these genres
    AnyGenre(&'static [&'static str]),
    /// Every one of these genres
    AllGenres(&'static [&'static str]),
    /// (science fiction or fantasy) and (action or adventure)
    Superhero,
    /// The movie's own mood label
    MoodLabel(Mood),
    /// Matches nothing
    Nothing,
}

impl Selector {
    /// Strict genre rule for a mood, falling back to the mood label.
    pub fn for_mood(mood: Mood) -> Selector {
        match mood {
            Mood::Horror => Selector::AnyGenre(&["horror"]),
            Mood::IntenseMystery => Selector::AnyGenre(&["mystery", "crime", "thriller"]),
            Mood::Romcom => Selector::AllGenres(&["comedy", "romance"]),
            Mood::Drama => Selector::AnyGenre(&["drama"]),
            Mood::Relaxing => Selector::AnyGenre(&["comedy", "family", "animation"]),
            other => Selector::MoodLabel(other),
        }
    }

    /// Selector and display label for a category name
    pub fn for_category(category: &str) -> (Selector, String) {
        let requested = category.trim();
        let label = match requested {
            "Intense" | "Intense Mystery" | "Mystery/Intense" => Mood::IntenseMystery.label(),
            other => other,
        };

        let selector = match label {
            "Western" => Selector::AnyGenre(&["western"]),
            "Fantasy" => Selector::AnyGenre(&["fantasy"]),
            "Science Fiction" | "Sci-Fi" | "Scifiction" => Selector::AnyGenre(&["science fiction", "sci-fi"]),
            "Superhero" => Selector::Superhero,
            other => match Mood::from_label(other) {
                Some(mood) => Selector::for_mood(mood),
                None => Selector::Nothing,
            },
        };
        (selector, label.to_string())
    }

    pub fn matches(&self, record: &MovieRecord) -> bool {
        match self {
            Selector::AnyGenre(genres) => genres.iter().any(|g| record.has_genre(g)),
            Selector::AllGenres(genres) => genres.iter().all(|g| record.has_genre(g)),
            Selector::Superhero => {
                (record.has_genre("science fiction") || record.has_genre("fantasy"))
                    && (record.has_genre("action") || record.has_genre("adventure"))
            }
            Selector::MoodLabel(mood) => record.mood_category == *mood,
            Selector::Nothing => false,
        }
    }
}

/// Browse and search over the catalog
pub struct DiscoverySource {
    catalog: Arc<Catalog>,

    /// Minimum vote count for browse lists
    min_vote_count: f32,

    /// Minimum vote count for the top-rated list
    top_min_vote_count: f32,

    /// Size of capped lists (mood, category, top rated)
    list_limit: usize,

    /// Number of search suggestions
    suggestion_limit: usize,
}

impl DiscoverySource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            min_vote_count: 10.0,
            top_min_vote_count: 100.0,
            list_limit: 10,
            suggestion_limit: 10,
        }
    }

    /// Configure the browse vote-count floor (default: 10)
    pub fn with_min_vote_count(mut self, count: f32) -> Self {
        self.min_vote_count = count;
        self
    }

    /// Configure the top-rated vote-count floor (default: 100)
    pub fn with_top_min_vote_count(mut self, count: f32) -> Self {
        self.top_min_vote_count = count;
        self
    }

    /// Configure the capped list size (default: 10)
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// Movies for a requested mood, best rated first
    #[instrument(skip(self))]
    pub fn by_mood(&self, mood: Mood) -> Vec<usize> {
        self.select(&Selector::for_mood(mood), self.min_vote_count, Some(self.list_limit))
    }

    /// Movies for a category name, with the normalized category label
    #[instrument(skip(self))]
    pub fn by_category(&self, category: &str) -> (String, Vec<usize>) {
        let (selector, label) = Selector::for_category(category);
        debug!(?selector, label = %label, "Resolved category");
        let positions = self.select(&selector, self.min_vote_count, Some(self.list_limit));
        (label, positions)
    }

    /// Every well-voted movie with this genre (case-insensitive)
    pub fn by_genre(&self, genre: &str) -> Vec<usize> {
        let positions = self.catalog.with_genre(genre).to_vec();
        self.rank(positions, self.min_vote_count, None)
    }

    /// Every well-voted movie crediting this person in this role
    pub fn by_person(&self, role: PersonRole, name: &str) -> Vec<usize> {
        let positions = self.catalog.with_person(role, name).to_vec();
        self.rank(positions, self.min_vote_count, None)
    }

    /// Best rated among widely voted movies
    pub fn top_rated(&self) -> Vec<usize> {
        let positions = (0..self.catalog.len()).collect();
        self.rank(positions, self.top_min_vote_count, Some(self.list_limit))
    }

    /// Distinct titles containing the lowercased query, sorted
    pub fn search_suggestions(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let titles: BTreeSet<&str> = self
            .catalog
            .records()
            .iter()
            .filter(|record| record.title.to_lowercase().contains(&query))
            .map(|record| record.title.as_str())
            .collect();
        titles
            .into_iter()
            .take(self.suggestion_limit)
            .map(str::to_string)
            .collect()
    }

    /// Overview text by id, else by normalized title; empty when unknown
    pub fn overview(&self, id: Option<MovieId>, title: Option<&str>) -> String {
        let by_id = id.and_then(|id| self.catalog.position_of_id(id));
        let by_title = || {
            title
                .filter(|t| !normalize_title(t).is_empty())
                .and_then(|t| self.catalog.find_title(t))
        };

        by_id
            .or_else(by_title)
            .and_then(|pos| self.catalog.get(pos))
            .map(|record| record.overview_text.clone())
            .unwrap_or_default()
    }

    fn select(&self, selector: &Selector, min_votes: f32, limit: Option<usize>) -> Vec<usize> {
        let positions = self
            .catalog
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| selector.matches(record))
            .map(|(pos, _)| pos)
            .collect();
        self.rank(positions, min_votes, limit)
    }

    /// Vote-count floor, then vote average desc, vote count desc
    fn rank(&self, positions: Vec<usize>, min_votes: f32, limit: Option<usize>) -> Vec<usize> {
        let mut ranked: Vec<(usize, &MovieRecord)> = positions
            .into_iter()
            .filter_map(|pos| self.catalog.get(pos).map(|record| (pos, record)))
            .filter(|(_, record)| record.vote_count.is_some_and(|count| count >= min_votes))
            .collect();

        ranked.sort_by(|(_, a), (_, b)| {
            compare_desc(a.vote_average, b.vote_average).then(compare_desc(a.vote_count, b.vote_count))
        });

        let mut positions: Vec<usize> = ranked.into_iter().map(|(pos, _)| pos).collect();
        if let Some(limit) = limit {
            positions.truncate(limit);
        }
        positions
    }
}

/// Descending order with missing values last
fn compare_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
