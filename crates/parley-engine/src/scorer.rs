//! Weighted rule evaluation over a signal bundle.
//!
//! The historical server variants carried several diverging copies of these
//! constants; they are configuration here, with one canonical table as the
//! default. The scorer returns raw deltas — clamping happens at the session
//! when the full delta is applied.

use serde::{Deserialize, Serialize};

use crate::signals::SignalBundle;

pub const CONCESSION_PRIMARY: &str = "primary concession";
pub const CONCESSION_MEDIA: &str = "media concession";
pub const CONCESSION_FLATTERY: &str = "flattery";

/// Compliment hits in a single utterance above which the flattery
/// concession is recorded.
const FLATTERY_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub commitment_score: i32,
    pub commitment_aid: i32,
    pub compliment_score: i32,
    pub compliment_aid: i32,
    pub resistance_score: i32,
    pub resistance_aid: i32,
    pub media_score: i32,
    pub media_aid: i32,
    pub risk_score: i32,
    pub unreciprocated_demand_score: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            commitment_score: 40,
            commitment_aid: 30,
            compliment_score: 5,
            compliment_aid: 5,
            resistance_score: -3,
            resistance_aid: -10,
            media_score: 25,
            media_aid: 15,
            risk_score: -15,
            unreciprocated_demand_score: -10,
        }
    }
}

/// Raw, unclamped outcome of scoring one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreDelta {
    pub score: i32,
    pub aid: i32,
    pub concessions: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Evaluate every rule exactly once against the bundle. Counts stack
    /// linearly and are unbounded; no clamping here.
    pub fn score(&self, bundle: &SignalBundle) -> ScoreDelta {
        let w = &self.weights;
        let mut delta = ScoreDelta::default();

        if bundle.explicit_commitment {
            delta.score += w.commitment_score;
            delta.aid += w.commitment_aid;
            delta.concessions.push(CONCESSION_PRIMARY);
        }

        delta.score += bundle.compliment_count as i32 * w.compliment_score;
        delta.aid += bundle.compliment_count as i32 * w.compliment_aid;

        delta.score += bundle.resistance_count as i32 * w.resistance_score;
        delta.aid += bundle.resistance_count as i32 * w.resistance_aid;

        if bundle.media_alignment {
            delta.score += w.media_score;
            delta.aid += w.media_aid;
            delta.concessions.push(CONCESSION_MEDIA);
        }

        if bundle.aid_requested_without_commitment {
            delta.score += w.unreciprocated_demand_score;
        }

        delta.score += bundle.risk_phrase_count as i32 * w.risk_score;

        if bundle.compliment_count > FLATTERY_THRESHOLD {
            delta.concessions.push(CONCESSION_FLATTERY);
        }

        delta
    }
}
