//! The in-memory catalog and its secondary indices.
//!
//! `Catalog` owns the records in positional order (row `i` of the
//! similarity matrix is `records[i]`) and builds lookup tables once:
//! - normalized title -> positions (a title is not guaranteed unique)
//! - id -> first position
//! - lowercased genre -> positions
//! - collection id -> positions
//! - lowercased cast / director name -> positions
//!
//! Records are never re-sorted after construction.

use crate::types::{MovieId, MovieRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which credit list a person lookup searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Cast,
    Director,
}

impl FromStr for PersonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cast" => Ok(PersonRole::Cast),
            "director" => Ok(PersonRole::Director),
            other => Err(format!("unknown person role: {other}")),
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonRole::Cast => f.write_str("cast"),
            PersonRole::Director => f.write_str("director"),
        }
    }
}

/// Title normalization used for lookups: trimmed and lowercased
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Immutable, positionally ordered movie catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    by_title: HashMap<String, Vec<usize>>,
    by_id: HashMap<MovieId, usize>,
    by_genre: HashMap<String, Vec<usize>>,
    by_collection: HashMap<i64, Vec<usize>>,
    by_cast: HashMap<String, Vec<usize>>,
    by_director: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Build the catalog and every lookup table in one pass.
    pub fn new(records: Vec<MovieRecord>) -> Self {
        let mut catalog = Catalog {
            records,
            ..Catalog::default()
        };

        for (pos, record) in catalog.records.iter().enumerate() {
            catalog
                .by_title
                .entry(normalize_title(&record.title))
                .or_default()
                .push(pos);
            catalog.by_id.entry(record.id).or_insert(pos);

            for genre in &record.genres {
                push_unique(catalog.by_genre.entry(genre.to_lowercase()).or_default(), pos);
            }
            if let Some(collection) = record.collection_id {
                catalog.by_collection.entry(collection).or_default().push(pos);
            }
            for name in &record.cast {
                push_unique(catalog.by_cast.entry(name.to_lowercase()).or_default(), pos);
            }
            for name in &record.director {
                push_unique(catalog.by_director.entry(name.to_lowercase()).or_default(), pos);
            }
        }

        catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MovieRecord> {
        self.records
    }

    pub fn get(&self, pos: usize) -> Option<&MovieRecord> {
        self.records.get(pos)
    }

    /// First record with this id
    pub fn position_of_id(&self, id: MovieId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// First record whose normalized title equals the normalized query
    pub fn find_title(&self, title: &str) -> Option<usize> {
        self.by_title
            .get(&normalize_title(title))
            .and_then(|positions| positions.first().copied())
    }

    /// Distinct normalized titles with their first position
    pub fn titles(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.by_title
            .iter()
            .filter_map(|(title, positions)| positions.first().map(|&pos| (title.as_str(), pos)))
    }

    /// Positions of movies carrying `genre` (case-insensitive), catalog order
    pub fn with_genre(&self, genre: &str) -> &[usize] {
        self.by_genre
            .get(&genre.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions sharing a collection id, catalog order
    pub fn in_collection(&self, collection_id: i64) -> &[usize] {
        self.by_collection
            .get(&collection_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions crediting `name` in `role` (case-insensitive exact match)
    pub fn with_person(&self, role: PersonRole, name: &str) -> &[usize] {
        let index = match role {
            PersonRole::Cast => &self.by_cast,
            PersonRole::Director => &self.by_director,
        };
        index
            .get(&name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn push_unique(positions: &mut Vec<usize>, pos: usize) {
    if positions.last() != Some(&pos) {
        positions.push(pos);
    }
}
