//! Test fixtures shared by the unit tests of this crate.

use data_loader::{Catalog, Mood, MovieRecord};
use features::SimilarityMatrix;

struct Fixture {
    id: i64,
    title: &'static str,
    year: &'static str,
    genres: &'static [&'static str],
    collection: Option<i64>,
    rating: Option<f32>,
    votes: f32,
    mood: Mood,
    director: &'static str,
}

const FIXTURES: &[Fixture] = &[
    Fixture { id: 862, title: "Toy Story", year: "1995", genres: &["Animation", "Comedy", "Family"], collection: Some(10194), rating: Some(7.7), votes: 5415.0, mood: Mood::Happy, director: "John Lasseter" },
    Fixture { id: 863, title: "Toy Story 2", year: "1999", genres: &["Animation", "Comedy", "Family"], collection: Some(10194), rating: Some(7.3), votes: 3914.0, mood: Mood::Happy, director: "John Lasseter" },
    Fixture { id: 10193, title: "Toy Story 3", year: "2010", genres: &["Animation", "Family"], collection: Some(10194), rating: Some(7.6), votes: 4597.0, mood: Mood::Happy, director: "Lee Unkrich" },
    Fixture { id: 585, title: "Monsters, Inc.", year: "2001", genres: &["Animation", "Comedy", "Family"], collection: None, rating: Some(7.5), votes: 4000.0, mood: Mood::Happy, director: "Pete Docter" },
    Fixture { id: 12, title: "Finding Nemo", year: "2003", genres: &["Animation", "Family"], collection: None, rating: Some(7.6), votes: 6000.0, mood: Mood::Happy, director: "Andrew Stanton" },
    Fixture { id: 49013, title: "Cars 2", year: "2011", genres: &["Animation", "Family", "Adventure"], collection: Some(87118), rating: Some(5.8), votes: 2000.0, mood: Mood::Happy, director: "John Lasseter" },
    Fixture { id: 694, title: "The Shining", year: "1980", genres: &["Horror", "Thriller"], collection: None, rating: Some(8.1), votes: 3800.0, mood: Mood::Horror, director: "Stanley Kubrick" },
    Fixture { id: 949, title: "Heat", year: "1995", genres: &["Action", "Crime", "Drama", "Thriller"], collection: None, rating: Some(7.7), votes: 1800.0, mood: Mood::IntenseMystery, director: "Michael Mann" },
    Fixture { id: 348, title: "Alien", year: "1979", genres: &["Horror", "Science Fiction"], collection: Some(8091), rating: Some(7.9), votes: 4500.0, mood: Mood::Horror, director: "Ridley Scott" },
    Fixture { id: 213121, title: "Toy Story of Terror!", year: "Unknown", genres: &["Animation", "Comedy"], collection: None, rating: Some(7.0), votes: 5.0, mood: Mood::Happy, director: "Angus MacLane" },
];

fn record(f: &Fixture) -> MovieRecord {
    let slug = f.title.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_");
    MovieRecord {
        id: f.id,
        title: f.title.to_string(),
        overview_text: format!("Overview of {}", f.title),
        genres: f.genres.iter().map(|s| s.to_string()).collect(),
        keywords: Vec::new(),
        cast: vec!["Tom Hanks".to_string()],
        director: vec![f.director.to_string()],
        poster_path: Some(format!("/{}.jpg", slug)),
        year: f.year.to_string(),
        vote_average: f.rating,
        vote_count: Some(f.votes),
        collection_id: f.collection,
        original_language: "en".to_string(),
        mood_category: f.mood,
        tag_string: String::new(),
    }
}

pub fn create_test_catalog() -> Catalog {
    Catalog::new(FIXTURES.iter().map(record).collect())
}

/// Symmetric matrix, 0.1 off the diagonal except for the pairs listed
pub fn create_test_matrix() -> SimilarityMatrix {
    let n = FIXTURES.len();
    let pairs: &[(usize, usize, f32)] = &[
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
    ];

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
