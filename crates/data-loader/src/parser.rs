//! CSV readers for the TMDB movie files.
//!
//! Two layouts are supported:
//! - an enriched single-file catalog (`tmdb_5000_movies_enriched.csv`) whose
//!   `tmdb_*` columns already carry the enrichment metadata
//! - the raw `tmdb_5000_movies.csv` + `tmdb_5000_credits.csv` pair, left-joined
//!   on `title`, with metadata pulled from a [`MetadataSource`]
//!
//! Every list-valued column goes through [`RawField::parse`] here, so nothing
//! past this module handles stringified structures.

use crate::error::{DataLoadError, Result};
use crate::metadata::{MetadataSource, year_from_release_date};
use crate::normalize::{self, RawField};
use crate::types::{MovieId, MovieMetadata, NormalizedMovie, UNKNOWN_LANGUAGE, UNKNOWN_YEAR};
use csv::StringRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const MOVIES_FILE: &str = "tmdb_5000_movies.csv";
pub const CREDITS_FILE: &str = "tmdb_5000_credits.csv";
pub const ENRICHED_FILE: &str = "tmdb_5000_movies_enriched.csv";

const ENRICHED_COLUMNS: &[&str] = &[
    "title",
    "overview",
    "genres",
    "keywords",
    "cast",
    "crew",
    "tmdb_poster_path",
    "tmdb_year",
    "tmdb_genres",
    "tmdb_vote_average",
    "tmdb_vote_count",
    "tmdb_collection_id",
    "tmdb_original_language",
];
const MOVIES_COLUMNS: &[&str] = &["id", "title", "overview", "genres", "keywords"];
const CREDITS_COLUMNS: &[&str] = &["title", "cast", "crew"];

/// Locations of the source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub movies: PathBuf,
    pub credits: PathBuf,
    pub enriched: PathBuf,
}

impl SourceFiles {
    /// Standard file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            movies: data_dir.join(MOVIES_FILE),
            credits: data_dir.join(CREDITS_FILE),
            enriched: data_dir.join(ENRICHED_FILE),
        }
    }

    /// Files the catalog will actually be read from, in read order
    pub fn active(&self) -> Vec<&Path> {
        if self.enriched.exists() {
            vec![self.enriched.as_path()]
        } else {
            vec![self.movies.as_path(), self.credits.as_path()]
        }
    }
}

/// Load normalized movies, preferring the enriched file when present.
pub fn load_movies(files: &SourceFiles, metadata: &dyn MetadataSource) -> Result<Vec<NormalizedMovie>> {
    if files.enriched.exists() {
        info!(path = %files.enriched.display(), "Loading enriched catalog");
        parse_enriched(&files.enriched)
    } else {
        info!(
            movies = %files.movies.display(),
            credits = %files.credits.display(),
            metadata = metadata.name(),
            "Loading raw movies and credits"
        );
        parse_raw(&files.movies, &files.credits, metadata)
    }
}

/// Parse the enriched single-file catalog
pub fn parse_enriched(path: &Path) -> Result<Vec<NormalizedMovie>> {
    let (columns, records) = read_csv(path, ENRICHED_COLUMNS)?;
    let id_column = columns.id_column(path, &["movie_id", "id"])?;

    let mut movies = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let title = columns.get(record, "title").trim();
        if title.is_empty() {
            warn!(file = %path.display(), row = row + 1, "Skipping row without a title");
            continue;
        }

        let metadata = MovieMetadata {
            poster_path: parse_optional_text(columns.get(record, "tmdb_poster_path")),
            year: parse_year(columns.get(record, "tmdb_year")),
            genres: normalize::extract_genres(&RawField::parse(columns.get(record, "tmdb_genres"))),
            vote_average: parse_optional_f32(columns.get(record, "tmdb_vote_average")),
            vote_count: parse_optional_f32(columns.get(record, "tmdb_vote_count")),
            collection_id: parse_optional_id(columns.get(record, "tmdb_collection_id")),
            original_language: parse_language(columns.get(record, "tmdb_original_language")),
        };

        movies.push(NormalizedMovie {
            id: parse_movie_id(columns.get(record, id_column)),
            title: title.to_string(),
            overview_text: columns.get(record, "overview").to_string(),
            genres: normalize::extract_genres(&RawField::parse(columns.get(record, "genres"))),
            keywords: normalize::extract_keywords(&RawField::parse(columns.get(record, "keywords"))),
            cast: normalize::extract_cast(&RawField::parse(columns.get(record, "cast"))),
            director: normalize::extract_directors(&RawField::parse(columns.get(record, "crew"))),
            metadata,
        });
    }

    info!(movies = movies.len(), "Parsed enriched catalog");
    Ok(movies)
}

/// Parse the raw movies and credits files and left-join them on `title`.
///
/// A movie matching several credit rows yields one movie per match; a movie
/// with no credit row keeps empty cast and crew.
pub fn parse_raw(
    movies_path: &Path,
    credits_path: &Path,
    metadata: &dyn MetadataSource,
) -> Result<Vec<NormalizedMovie>> {
    let (movie_columns, movie_records) = read_csv(movies_path, MOVIES_COLUMNS)?;
    let (credit_columns, credit_records) = read_csv(credits_path, CREDITS_COLUMNS)?;

    let mut credits_by_title: HashMap<&str, Vec<&StringRecord>> = HashMap::new();
    for record in &credit_records {
        credits_by_title
            .entry(credit_columns.get(record, "title"))
            .or_default()
            .push(record);
    }
    debug!(titles = credits_by_title.len(), "Indexed credits by title");

    let mut movies = Vec::with_capacity(movie_records.len());
    for (row, record) in movie_records.iter().enumerate() {
        let raw_title = movie_columns.get(record, "title");
        let title = raw_title.trim();
        if title.is_empty() {
            warn!(file = %movies_path.display(), row = row + 1, "Skipping row without a title");
            continue;
        }

        let raw_id = movie_columns.get(record, "id");
        let id = parse_movie_id(raw_id);
        let source_genres = normalize::extract_genres(&RawField::parse(movie_columns.get(record, "genres")));
        let keywords = normalize::extract_keywords(&RawField::parse(movie_columns.get(record, "keywords")));
        let overview_text = movie_columns.get(record, "overview").to_string();

        let fallback = MovieMetadata {
            poster_path: None,
            year: year_from_release_date(movie_columns.get(record, "release_date"))
                .unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
            genres: source_genres.clone(),
            vote_average: parse_optional_f32(movie_columns.get(record, "vote_average")),
            vote_count: parse_optional_f32(movie_columns.get(record, "vote_count")),
            collection_id: None,
            original_language: parse_language(movie_columns.get(record, "original_language")),
        };
        let movie_metadata = if is_numeric_id(raw_id) {
            metadata.lookup(id)
        } else {
            MovieMetadata::default()
        }
        .or_fill_from(fallback);

        let credit_rows = credits_by_title.get(raw_title).map(Vec::as_slice).unwrap_or(&[]);
        let credit_pairs: Vec<(Vec<String>, Vec<String>)> = if credit_rows.is_empty() {
            vec![(Vec::new(), Vec::new())]
        } else {
            credit_rows
                .iter()
                .map(|credit| {
                    (
                        normalize::extract_cast(&RawField::parse(credit_columns.get(credit, "cast"))),
                        normalize::extract_directors(&RawField::parse(credit_columns.get(credit, "crew"))),
                    )
                })
                .collect()
        };

        for (cast, director) in credit_pairs {
            movies.push(NormalizedMovie {
                id,
                title: title.to_string(),
                overview_text: overview_text.clone(),
                genres: source_genres.clone(),
                keywords: keywords.clone(),
                cast,
                director,
                metadata: movie_metadata.clone(),
            });
        }
    }

    info!(movies = movies.len(), credits = credit_records.len(), "Joined raw movies with credits");
    Ok(movies)
}

// =============================================================================
// CSV plumbing
// =============================================================================

/// Header positions of one CSV file, names trimmed
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        Self { index }
    }

    fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.index.contains_key(**name))
            .map(|name| name.to_string())
            .collect()
    }

    /// First present column among `candidates`
    fn id_column<'c>(&self, path: &Path, candidates: &[&'c str]) -> Result<&'c str> {
        candidates
            .iter()
            .copied()
            .find(|name| self.index.contains_key(*name))
            .ok_or_else(|| DataLoadError::MissingColumns {
                file: path.display().to_string(),
                columns: vec![candidates.join(" or ")],
            })
    }

    /// Field value, empty when the column or cell is absent
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

fn read_csv(path: &Path, required: &[&str]) -> Result<(Columns, Vec<StringRecord>)> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = path.display().to_string();
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        file: file.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let columns = Columns::from_headers(reader.headers().map_err(csv_error)?);

    let missing = columns.missing(required);
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            file: file.clone(),
            columns: missing,
        });
    }

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_error)?;
    debug!(file = %file, rows = records.len(), "Read CSV");
    Ok((columns, records))
}

// =============================================================================
// Field parsing
// =============================================================================

fn is_null_text(text: &str) -> bool {
    matches!(text, "" | "nan" | "NaN" | "None" | "null")
}

fn is_numeric_id(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}

/// Numeric ids (including float renderings like `"862.0"`) parse directly;
/// anything else gets a stable id synthesized from its SHA-256 digest.
pub fn parse_movie_id(raw: &str) -> MovieId {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<MovieId>() {
        return id;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return value as MovieId;
        }
    }
    synthesize_id(trimmed)
}

fn synthesize_id(source: &str) -> MovieId {
    let digest = Sha256::digest(source.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(bytes) & i64::MAX as u64) as MovieId
}

fn parse_optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!is_null_text(trimmed)).then(|| trimmed.to_string())
}

fn parse_optional_f32(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    if is_null_text(trimmed) {
        return None;
    }
    trimmed.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_optional_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if is_null_text(trimmed) {
        return None;
    }
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

/// `"1995"` and `"1995.0"` become `"1995"`; blanks become "Unknown"
fn parse_year(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_null_text(trimmed) {
        return UNKNOWN_YEAR.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => format!("{}", value as i64),
        _ => trimmed.to_string(),
    }
}

fn parse_language(raw: &str) -> String {
    parse_optional_text(raw).unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataMap, UnknownMetadata};
    use std::fs;
    use tempfile::TempDir;

    const MOVIES_CSV: &str = "\
id,title,overview,genres,keywords,release_date,vote_average,vote_count,original_language
862,Toy Story,Led by Woody.,\"[{\"\"id\"\": 16, \"\"name\"\": \"\"Animation\"\"}]\",\"[{\"\"id\"\": 931, \"\"name\"\": \"\"jealousy\"\"}]\",1995-10-30,7.7,5415,en
863,Toy Story 2,Woody is stolen.,\"[{\"\"id\"\": 16, \"\"name\"\": \"\"Animation\"\"}]\",[],1999-10-30,7.3,3914,en
,,No title here.,[],[],,,,
";

    const CREDITS_CSV: &str = "\
movie_id,title,cast,crew
862,Toy Story,\"[{\"\"name\"\": \"\"Tom Hanks\"\"}, {\"\"name\"\": \"\"Tim Allen\"\"}]\",\"[{\"\"job\"\": \"\"Director\"\", \"\"name\"\": \"\"John Lasseter\"\"}]\"
";

    fn write_raw_pair(dir: &TempDir) -> SourceFiles {
        let files = SourceFiles::in_dir(dir.path());
        fs::write(&files.movies, MOVIES_CSV).unwrap();
        fs::write(&files.credits, CREDITS_CSV).unwrap();
        files
    }

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(parse_movie_id("862"), 862);
        assert_eq!(parse_movie_id("862.0"), 862);
        let synthesized = parse_movie_id("tt0114709");
        assert!(synthesized >= 0);
        assert_eq!(synthesized, parse_movie_id("tt0114709"));
        assert_ne!(synthesized, parse_movie_id("tt0114710"));
    }

    #[test]
    fn test_field_parsers() {
        assert_eq!(parse_year("1995.0"), "1995");
        assert_eq!(parse_year(""), "Unknown");
        assert_eq!(parse_year("Unknown"), "Unknown");
        assert_eq!(parse_optional_f32("nan"), None);
        assert_eq!(parse_optional_id("10194.0"), Some(10194));
        assert_eq!(parse_language(""), "N/A");
    }

    #[test]
    fn test_raw_join_and_skip_untitled() {
        let dir = TempDir::new().unwrap();
        let files = write_raw_pair(&dir);

        let movies = load_movies(&files, &UnknownMetadata).unwrap();
        assert_eq!(movies.len(), 2);

        let toy_story = &movies[0];
        assert_eq!(toy_story.id, 862);
        assert_eq!(toy_story.cast, vec!["Tom Hanks", "Tim Allen"]);
        assert_eq!(toy_story.director, vec!["John Lasseter"]);
        assert_eq!(toy_story.metadata.year, "1995");
        assert_eq!(toy_story.metadata.vote_average, Some(7.7));
        assert_eq!(toy_story.metadata.original_language, "en");

        let sequel = &movies[1];
        assert!(sequel.cast.is_empty());
        assert!(sequel.director.is_empty());
        assert!(sequel.keywords.is_empty());
    }

    #[test]
    fn test_metadata_source_wins_over_fallback() {
        let dir = TempDir::new().unwrap();
        let files = write_raw_pair(&dir);

        let mut metadata = MetadataMap::default();
        metadata.insert(
            862,
            MovieMetadata {
                collection_id: Some(10194),
                vote_average: Some(8.0),
                ..MovieMetadata::default()
            },
        );

        let movies = load_movies(&files, &metadata).unwrap();
        assert_eq!(movies[0].metadata.collection_id, Some(10194));
        assert_eq!(movies[0].metadata.vote_average, Some(8.0));
        assert_eq!(movies[0].metadata.year, "1995");
    }

    #[test]
    fn test_duplicate_credit_rows_multiply() {
        let dir = TempDir::new().unwrap();
        let files = SourceFiles::in_dir(dir.path());
        fs::write(&files.movies, MOVIES_CSV).unwrap();
        fs::write(
            &files.credits,
            "movie_id,title,cast,crew\n1,Toy Story,[],[]\n2,Toy Story,['Someone'],[]\n",
        )
        .unwrap();

        let movies = load_movies(&files, &UnknownMetadata).unwrap();
        let toy_story: Vec<_> = movies.iter().filter(|m| m.title == "Toy Story").collect();
        assert_eq!(toy_story.len(), 2);
        assert_eq!(toy_story[1].cast, vec!["Someone"]);
    }

    #[test]
    fn test_missing_columns_are_fatal() {
        let dir = TempDir::new().unwrap();
        let files = SourceFiles::in_dir(dir.path());
        fs::write(&files.movies, "id,title\n1,Heat\n").unwrap();
        fs::write(&files.credits, CREDITS_CSV).unwrap();

        let err = load_movies(&files, &UnknownMetadata).unwrap_err();
        match err {
            DataLoadError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["overview", "genres", "keywords"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_enriched_file_preferred() {
        let dir = TempDir::new().unwrap();
        let files = write_raw_pair(&dir);
        fs::write(
            &files.enriched,
            "movie_id,title,overview,genres,keywords,cast,crew,tmdb_poster_path,tmdb_year,tmdb_genres,\
tmdb_vote_average,tmdb_vote_count,tmdb_collection_id,tmdb_original_language\n\
862,Toy Story,Toys.,\"[{'name': 'Animation'}]\",[],\"[{'name': 'Tom Hanks'}]\",\
\"[{'job': 'Director', 'name': 'John Lasseter'}]\",/toy.jpg,1995.0,\"['Animation', 'Family']\",7.7,5415.0,10194.0,en\n",
        )
        .unwrap();

        assert_eq!(files.active(), vec![files.enriched.as_path()]);
        let movies = load_movies(&files, &UnknownMetadata).unwrap();
        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.metadata.collection_id, Some(10194));
        assert_eq!(movie.metadata.year, "1995");
        assert_eq!(movie.metadata.genres, vec!["Animation", "Family"]);
        assert_eq!(movie.metadata.poster_path.as_deref(), Some("/toy.jpg"));
        assert_eq!(movie.director, vec!["John Lasseter"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let files = SourceFiles::in_dir(dir.path());
        let err = load_movies(&files, &UnknownMetadata).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
