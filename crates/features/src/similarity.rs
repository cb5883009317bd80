//! Pairwise cosine similarity.
//!
//! ## Algorithm
//! An inverted index (term -> documents containing it) turns each row into
//! a sparse accumulation: for every term of document `i`, add
//! `count_i * count_j` to every `j` sharing it. Rows are independent and
//! run in parallel with rayon. The upper triangle is then mirrored onto
//! the lower one so `m[i][j] == m[j][i]` holds bit for bit, values are
//! clamped to [0, 1], and the diagonal is pinned to 1.0.
//!
//! A document with no in-vocabulary term has similarity 0 to everything else.

use crate::vectorizer::TermCounts;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Square, symmetric similarity matrix, row-major.
///
/// Row `i` belongs to the catalog entry at position `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Rebuild from raw parts; `None` unless `values` is exactly `n * n`
    pub fn from_parts(n: usize, values: Vec<f32>) -> Option<Self> {
        (n.checked_mul(n) == Some(values.len())).then_some(Self { n, values })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.n + j]
    }

    /// Symmetric, unit diagonal, entries within [0, 1]
    pub fn is_well_formed(&self) -> bool {
        if self.values.len() != self.n * self.n {
            return false;
        }
        (0..self.n).all(|i| {
            self.get(i, i) == 1.0
                && (0..i).all(|j| {
                    let v = self.get(i, j);
                    v == self.get(j, i) && (0.0..=1.0).contains(&v)
                })
        })
    }
}

/// Cosine similarity of every pair of count vectors
pub fn cosine_similarity(vectors: &[TermCounts], vocabulary_size: usize) -> SimilarityMatrix {
    let start = Instant::now();
    let n = vectors.len();

    let mut postings: Vec<Vec<(usize, u32)>> = vec![Vec::new(); vocabulary_size];
    for (doc, vector) in vectors.iter().enumerate() {
        for &(term, count) in &vector.entries {
            postings[term].push((doc, count));
        }
    }
    let norms: Vec<f64> = vectors.iter().map(TermCounts::norm).collect();

    let mut values = vec![0.0f32; n * n];
    if n > 0 {
        values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            if norms[i] == 0.0 {
                return;
            }
            let mut dots = vec![0.0f64; n];
            for &(term, count) in &vectors[i].entries {
                for &(j, other) in &postings[term] {
                    if j > i {
                        dots[j] += count as f64 * other as f64;
                    }
                }
            }
            for j in (i + 1)..n {
                if dots[j] > 0.0 && norms[j] > 0.0 {
                    row[j] = (dots[j] / (norms[i] * norms[j])).clamp(0.0, 1.0) as f32;
                }
            }
        });
    }

    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in 0..i {
            values[i * n + j] = values[j * n + i];
        }
    }

    info!(movies = n, elapsed_ms = start.elapsed().as_millis() as u64, "Computed similarity matrix");
    SimilarityMatrix { n, values }
}
