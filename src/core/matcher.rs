use crate::core::scoring::calculate_match_score;
use crate::models::{Client, MatchResult, Property, RankedProperty, ScoringWeights};

/// Result of ranking an inventory against one client
#[derive(Debug, Clone)]
pub struct Ranking {
    pub matches: Vec<RankedProperty>,
    pub total_candidates: usize,
}

/// Ranks properties against a selected client
///
/// Holds only the weight table; every call is independent, so one `Matcher`
/// can be shared across workers without locking.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_score: u32,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights, min_score: 0 }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Drop ranked results scoring below `min_score`
    pub fn with_min_score(mut self, min_score: u32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single (property, client) pair
    pub fn score(&self, property: &Property, client: &Client) -> MatchResult {
        calculate_match_score(property, client, &self.weights)
    }

    /// Rank properties for a client
    ///
    /// # Arguments
    /// * `client` - The selected client
    /// * `properties` - The tenant's inventory
    /// * `limit` - Maximum number of results, `None` for all
    ///
    /// # Returns
    /// Ranking sorted by score descending; equal scores keep inventory order
    pub fn rank(&self, client: &Client, properties: &[Property], limit: Option<usize>) -> Ranking {
        let total_candidates = properties.len();

        let mut matches: Vec<RankedProperty> = properties
            .iter()
            .map(|property| RankedProperty {
                result: self.score(property, client),
                property: property.clone(),
            })
            .filter(|ranked| ranked.result.score >= self.min_score)
            .collect();

        // Stable sort
        matches.sort_by(|a, b| b.result.score.cmp(&a.result.score));

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        Ranking {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
