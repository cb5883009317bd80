//! Test fixtures shared by the unit tests of this crate.

use data_loader::{Catalog, Mood, MovieRecord};
use features::SimilarityMatrix;

pub struct Fixture {
    pub id: i64,
    pub title: &'static str,
    pub year: &'static str,
    pub genres: &'static [&'static str],
    pub collection: Option<i64>,
    pub rating: Option<f32>,
    pub votes: Option<f32>,
    pub mood: Mood,
    pub cast: &'static [&'static str],
    pub director: &'static [&'static str],
}

pub const FIXTURES: &[Fixture] = &[
    Fixture { id: 862, title: "Toy Story", year: "1995", genres: &["Animation", "Comedy", "Family"], collection: Some(10194), rating: Some(7.7), votes: Some(5415.0), mood: Mood::Happy, cast: &["Tom Hanks", "Tim Allen"], director: &["John Lasseter"] },
    Fixture { id: 863, title: "Toy Story 2", year: "1999", genres: &["Animation", "Comedy", "Family"], collection: Some(10194), rating: Some(7.3), votes: Some(3914.0), mood: Mood::Happy, cast: &["Tom Hanks", "Tim Allen"], director: &["John Lasseter"] },
    Fixture { id: 10193, title: "Toy Story 3", year: "2010", genres: &["Animation", "Family"], collection: Some(10194), rating: Some(7.6), votes: Some(4597.0), mood: Mood::Happy, cast: &["Tom Hanks"], director: &["Lee Unkrich"] },
    Fixture { id: 585, title: "Monsters, Inc.", year: "2001", genres: &["Animation", "Comedy", "Family"], collection: None, rating: Some(7.5), votes: Some(4000.0), mood: Mood::Happy, cast: &["John Goodman"], director: &["Pete Docter"] },
    Fixture { id: 12, title: "Finding Nemo", year: "2003", genres: &["Animation", "Family"], collection: None, rating: Some(7.6), votes: Some(6000.0), mood: Mood::Happy, cast: &["Albert Brooks"], director: &["Andrew Stanton"] },
    Fixture { id: 49013, title: "Cars 2", year: "2011", genres: &["Animation", "Family", "Adventure"], collection: Some(87118), rating: Some(5.8), votes: Some(2000.0), mood: Mood::Happy, cast: &["Owen Wilson"], director: &["John Lasseter"] },
    Fixture { id: 694, title: "The Shining", year: "1980", genres: &["Horror", "Thriller"], collection: None, rating: Some(8.1), votes: Some(3800.0), mood: Mood::Horror, cast: &["Jack Nicholson"], director: &["Stanley Kubrick"] },
    Fixture { id: 949, title: "Heat", year: "1995", genres: &["Action", "Crime", "Drama", "Thriller"], collection: None, rating: Some(7.7), votes: Some(1800.0), mood: Mood::IntenseMystery, cast: &["Al Pacino"], director: &["Michael Mann"] },
    Fixture { id: 348, title: "Alien", year: "1979", genres: &["Horror", "Science Fiction"], collection: Some(8091), rating: Some(7.9), votes: Some(4500.0), mood: Mood::Horror, cast: &["Sigourney Weaver"], director: &["Ridley Scott"] },
    Fixture { id: 213121, title: "Toy Story of Terror!", year: "Unknown", genres: &["Animation", "Comedy"], collection: None, rating: Some(7.0), votes: Some(5.0), mood: Mood::Happy, cast: &["Tom Hanks"], director: &["Angus MacLane"] },
];

pub fn record(f: &Fixture) -> MovieRecord {
    MovieRecord {
        id: f.id,
        title: f.title.to_string(),
        overview_text: format!("Overview of {}", f.title),
        genres: f.genres.iter().map(|s| s.to_string()).collect(),
        keywords: Vec::new(),
        cast: f.cast.iter().map(|s| s.to_string()).collect(),
        director: f.director.iter().map(|s| s.to_string()).collect(),
        poster_path: None,
        year: f.year.to_string(),
        vote_average: f.rating,
        vote_count: f.votes,
        collection_id: f.collection,
        original_language: "en".to_string(),
        mood_category: f.mood,
        tag_string: String::new(),
    }
}

pub fn create_test_catalog() -> Catalog {
    Catalog::new(FIXTURES.iter().map(record).collect())
}

/// Symmetric matrix with `pairs` set explicitly and 0.1 everywhere else
pub fn matrix_with(n: usize, pairs: &[(usize, usize, f32)]) -> SimilarityMatrix {
    let mut values = vec![0.1f32; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
    }
    for &(i, j, v) in pairs {
        values[i * n + j] = v;
        values[j * n + i] = v;
    }
    SimilarityMatrix::from_parts(n, values).unwrap()
}

pub fn create_test_matrix() -> SimilarityMatrix {
    matrix_with(
        FIXTURES.len(),
        &[
            (0, 1, 0.9),
            (0, 2, 0.85),
            (0, 3, 0.6),
            (0, 4, 0.5),
            (0, 5, 0.55),
            (0, 6, 0.05),
            (0, 7, 0.02),
            (0, 9, 0.7),
            (1, 2, 0.8),
            (6, 8, 0.4),
        ],
    )
}
