//! End-to-end tests for the engine: CSV files in a temporary directory,
//! a real build, the cache, and the browse calls.

use data_loader::Mood;
use data_loader::parser::{CREDITS_FILE, ENRICHED_FILE, MOVIES_FILE};
use features::ConstantScorer;
use server::{EngineConfig, EngineError, MovieEngine};
use sources::RecommendationReason;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const HEADER: &str = "movie_id,title,overview,genres,keywords,cast,crew,tmdb_poster_path,tmdb_year,\
tmdb_genres,tmdb_vote_average,tmdb_vote_count,tmdb_collection_id,tmdb_original_language";

struct Row {
    id: i64,
    title: &'static str,
    overview: &'static str,
    genres: &'static [&'static str],
    cast: &'static [&'static str],
    director: &'static str,
    year: &'static str,
    rating: &'static str,
    votes: &'static str,
    collection: &'static str,
}

const ROWS: &[Row] = &[
    Row { id: 862, title: "Toy Story", overview: "A cowboy doll is threatened by a new spaceman toy in a boy's bedroom.", genres: &["Animation", "Comedy", "Family"], cast: &["Tom Hanks", "Tim Allen"], director: "John Lasseter", year: "1995", rating: "7.7", votes: "5415", collection: "10194" },
    Row { id: 863, title: "Toy Story 2", overview: "The toys rescue a cowboy doll stolen by a greedy toy collector.", genres: &["Animation", "Comedy", "Family"], cast: &["Tom Hanks", "Tim Allen"], director: "John Lasseter", year: "1999", rating: "7.3", votes: "3914", collection: "10194" },
    Row { id: 10193, title: "Toy Story 3", overview: "The toys are donated to a daycare and plan a daring escape.", genres: &["Animation", "Family"], cast: &["Tom Hanks"], director: "Lee Unkrich", year: "2010", rating: "7.6", votes: "4597", collection: "10194" },
    Row { id: 585, title: "Monsters, Inc.", overview: "Monsters scare children to power their city until a little girl gets loose.", genres: &["Animation", "Comedy", "Family"], cast: &["John Goodman"], director: "Pete Docter", year: "2001", rating: "7.5", votes: "4000", collection: "" },
    Row { id: 12, title: "Finding Nemo", overview: "A clownfish father crosses the ocean to find his son.", genres: &["Animation", "Family"], cast: &["Albert Brooks"], director: "Andrew Stanton", year: "2003", rating: "7.6", votes: "6000", collection: "" },
    Row { id: 694, title: "The Shining", overview: "A writer and his family spend the winter in an isolated hotel haunted by evil.", genres: &["Horror", "Thriller"], cast: &["Jack Nicholson"], director: "Stanley Kubrick", year: "1980", rating: "8.1", votes: "3800", collection: "" },
    Row { id: 949, title: "Heat", overview: "A detective hunts a crew of professional thieves across the city.", genres: &["Action", "Crime", "Drama", "Thriller"], cast: &["Al Pacino"], director: "Michael Mann", year: "1995", rating: "7.7", votes: "1800", collection: "" },
    Row { id: 49013, title: "Cars 2", overview: "Race cars travel the world and a tow truck becomes a spy.", genres: &["Animation", "Family", "Adventure"], cast: &["Owen Wilson"], director: "John Lasseter", year: "2011", rating: "5.8", votes: "2000", collection: "87118" },
    Row { id: 348, title: "Alien", overview: "The crew of a spaceship is hunted by a deadly alien creature.", genres: &["Horror", "Science Fiction"], cast: &["Sigourney Weaver"], director: "Ridley Scott", year: "1979", rating: "7.9", votes: "4500", collection: "8091" },
];

fn names(items: &[&str]) -> String {
    let inner: Vec<String> = items.iter().map(|n| format!("{{'name': '{}'}}", n)).collect();
    format!("\"[{}]\"", inner.join(", "))
}

fn plain_list(items: &[&str]) -> String {
    let inner: Vec<String> = items.iter().map(|n| format!("'{}'", n)).collect();
    format!("\"[{}]\"", inner.join(", "))
}

fn csv_line(row: &Row) -> String {
    let slug = row.title.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "");
    [
        row.id.to_string(),
        format!("\"{}\"", row.title),
        format!("\"{}\"", row.overview),
        names(row.genres),
        "[]".to_string(),
        names(row.cast),
        format!("\"[{{'job': 'Director', 'name': '{}'}}]\"", row.director),
        format!("/{}.jpg", slug),
        row.year.to_string(),
        plain_list(row.genres),
        row.rating.to_string(),
        row.votes.to_string(),
        row.collection.to_string(),
        "en".to_string(),
    ]
    .join(",")
}

fn write_enriched(dir: &Path, rows: &[Row]) {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(&csv_line(row));
        text.push('\n');
    }
    fs::write(dir.join(ENRICHED_FILE), text).unwrap();
}

fn create_test_engine(data: &TempDir, cache: &TempDir) -> MovieEngine {
    let config = EngineConfig::default()
        .with_data_dir(data.path())
        .with_cache_dir(cache.path());
    MovieEngine::new(config).with_sentiment_scorer(Arc::new(ConstantScorer(0.0)))
}

fn setup() -> (TempDir, TempDir) {
    let data = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_enriched(data.path(), ROWS);
    (data, cache)
}

#[test]
fn test_recommend_franchise_then_similar() {
    let (data, cache) = setup();
    let engine = create_test_engine(&data, &cache);

    let results = engine.recommend("toy story");
    let titles: Vec<&str> = results.iter().map(|r| r.movie.title.as_str()).collect();

    assert_eq!(&titles[..2], &["Toy Story 2", "Toy Story 3"]);
    assert!(
        results[..2]
            .iter()
            .all(|r| r.recommendation_reason == Some(RecommendationReason::SameFranchise))
    );

    let mut rest: Vec<&str> = titles[2..].to_vec();
    rest.sort();
    assert_eq!(rest, vec!["Finding Nemo", "Monsters, Inc."]);
    assert!(results[2..].iter().all(|r| r.similarity_score.is_some()));
    assert!(results[2].score >= results[3].score);

    assert_eq!(results[0].movie.poster_url, "https://image.tmdb.org/t/p/w500/toystory2.jpg");
    assert_eq!(results[0].movie.language, "EN");
}

#[test]
fn test_recommend_unknown_title() {
    let (data, cache) = setup();
    let engine = create_test_engine(&data, &cache);

    let results = engine.recommend("Qqqq Zzzz Xxxx");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].movie.movie_id, None);
    assert_eq!(results[0].movie.title, "Movie 'Qqqq Zzzz Xxxx' not found in database.");
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let (data, cache) = setup();
    let engine = create_test_engine(&data, &cache);

    let snapshot = engine.load_or_build_catalog().unwrap();
    assert_eq!(snapshot.len(), ROWS.len());
    assert!(snapshot.matrix().is_well_formed());
    assert!(snapshot.catalog().records().iter().all(|r| !r.tag_string.is_empty()));
}

#[test]
fn test_cache_round_trip() {
    let (data, cache) = setup();

    let first = create_test_engine(&data, &cache).load_or_build_catalog().unwrap();
    assert!(cache.path().join("catalog_cache.bin").exists());
    assert!(cache.path().join("similarity_cache.bin").exists());

    let second = create_test_engine(&data, &cache).load_or_build_catalog().unwrap();
    assert_eq!(first.catalog().records(), second.catalog().records());
    assert_eq!(first.matrix().as_ref(), second.matrix().as_ref());
    assert_eq!(first.source_stamp(), second.source_stamp());
}

#[test]
fn test_changed_source_invalidates_cache() {
    let (data, cache) = setup();
    let first = create_test_engine(&data, &cache).load_or_build_catalog().unwrap();

    write_enriched(data.path(), &ROWS[..5]);
    let second = create_test_engine(&data, &cache).load_or_build_catalog().unwrap();

    assert_eq!(second.len(), 5);
    assert_ne!(first.source_stamp(), second.source_stamp());
}

#[test]
fn test_cache_used_when_sources_are_gone() {
    let (data, cache) = setup();
    create_test_engine(&data, &cache).load_or_build_catalog().unwrap();

    fs::remove_file(data.path().join(ENRICHED_FILE)).unwrap();
    let snapshot = create_test_engine(&data, &cache).load_or_build_catalog().unwrap();
    assert_eq!(snapshot.len(), ROWS.len());
}

#[test]
fn test_no_data_reports_not_ready() {
    let data = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let engine = create_test_engine(&data, &cache);

    assert!(matches!(engine.load_or_build_catalog(), Err(EngineError::Load(_))));
    let results = engine.recommend("Heat");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].movie.title, "Recommendation system not ready.");
}

#[test]
fn test_rebuild_swaps_snapshot() {
    let (data, cache) = setup();
    let engine = create_test_engine(&data, &cache);

    let before = engine.load_or_build_catalog().unwrap();
    write_enriched(data.path(), &ROWS[..3]);
    let after = engine.rebuild().unwrap();

    assert_eq!(before.len(), ROWS.len());
    assert_eq!(after.len(), 3);
    assert_eq!(engine.snapshot().unwrap().len(), 3);
}

#[test]
fn test_browse_calls() {
    let (data, cache) = setup();
    let engine = create_test_engine(&data, &cache);

    let horror: Vec<String> = engine
        .movies_by_genre("horror")
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(horror, vec!["The Shining", "Alien"]);

    let lasseter: Vec<String> = engine
        .movies_by_person("director", "John Lasseter")
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(lasseter, vec!["Toy Story", "Toy Story 2", "Cars 2"]);
    assert!(matches!(
        engine.movies_by_person("writer", "Anyone"),
        Err(EngineError::UnknownRole(_))
    ));

    let category = engine.movies_by_category("Mystery/Intense").unwrap();
    assert_eq!(category.category, "Intense/Mystery");
    assert_eq!(category.movies.len(), 2);

    let mood = engine.movies_by_mood_text("I want something spooky").unwrap();
    assert_eq!(mood.mood, Mood::Horror);
    assert_eq!(mood.movies[0].title, "The Shining");

    assert_eq!(engine.top_rated().unwrap()[0].title, "The Shining");
    assert_eq!(
        engine.search_suggestions("toy").unwrap(),
        vec!["Toy Story", "Toy Story 2", "Toy Story 3"]
    );
    assert_eq!(
        engine.overview(Some(949), None).unwrap(),
        "A detective hunts a crew of professional thieves across the city."
    );
    assert_eq!(engine.overview(None, Some("ALIEN")).unwrap(), ROWS[8].overview);
}

#[test]
fn test_raw_layout_with_metadata_file() {
    let data = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();

    fs::write(
        data.path().join(MOVIES_FILE),
        "id,title,overview,genres,keywords\n\
862,Toy Story,Toys come to life.,\"[{\"\"name\"\": \"\"Animation\"\"}]\",[]\n\
863,Toy Story 2,Toys come to life again.,\"[{\"\"name\"\": \"\"Animation\"\"}]\",[]\n",
    )
    .unwrap();
    fs::write(data.path().join(CREDITS_FILE), "title,cast,crew\nToy Story,[],[]\n").unwrap();

    let metadata = data.path().join("metadata.json");
    fs::write(
        &metadata,
        r#"{"862": {"year": "1995", "collection_id": 10194, "vote_average": 7.7},
            "863": {"year": "1999", "collection_id": 10194, "vote_average": 7.3}}"#,
    )
    .unwrap();

    let config = EngineConfig::default()
        .with_data_dir(data.path())
        .with_cache_dir(cache.path())
        .with_metadata_file(&metadata);
    let engine = MovieEngine::new(config).with_sentiment_scorer(Arc::new(ConstantScorer(0.0)));

    let results = engine.recommend("Toy Story");
    assert_eq!(results[0].movie.title, "Toy Story 2");
    assert_eq!(results[0].movie.year, "1999");
    assert_eq!(results[0].recommendation_reason, Some(RecommendationReason::SameFranchise));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_snapshot() {
    let (data, cache) = setup();
    let engine = Arc::new(create_test_engine(&data, &cache));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            tokio::task::spawn_blocking(move || engine.recommend("Toy Story"))
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.push(handle.await.unwrap());
    }
    assert!(all.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(all[0][0].movie.title, "Toy Story 2");
}
