//! Lexicon-based sentiment scoring.

use vader_sentiment::SentimentIntensityAnalyzer;

/// Produces a compound sentiment score in [-1, 1]
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// VADER compound score
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

/// Fixed score for every input
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer(pub f64);

impl SentimentScorer for ConstantScorer {
    fn compound(&self, _text: &str) -> f64 {
        self.0
    }
}
