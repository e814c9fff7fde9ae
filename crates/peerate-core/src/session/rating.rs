//! Rating ledger.
//!
//! The ledger stores one tuple per `(rater, target, topic)`. Each submission replaces the whole
//! set of tuples previously recorded for its rater; nothing is merged.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label used on the wire and on disk for a skipped rating.
pub const SKIPPED_LABEL: &str = "skipped";

/// A bounded score, or the sentinel meaning "no rating given".
///
/// Serialized as a bare number or the string `"skipped"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRatingValue", into = "RawRatingValue")]
pub enum RatingValue {
    Score(u8),
    Skipped,
}

impl RatingValue {
    pub fn score(&self) -> Option<u8> {
        match self {
            Self::Score(score) => Some(*score),
            Self::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRatingValue {
    Score(u8),
    Label(String),
}

impl TryFrom<RawRatingValue> for RatingValue {
    type Error = String;

    fn try_from(raw: RawRatingValue) -> Result<Self, Self::Error> {
        match raw {
            RawRatingValue::Score(score) => Ok(Self::Score(score)),
            RawRatingValue::Label(label) if label == SKIPPED_LABEL => Ok(Self::Skipped),
            RawRatingValue::Label(label) => Err(format!("unknown rating value '{label}'")),
        }
    }
}

impl From<RatingValue> for RawRatingValue {
    fn from(value: RatingValue) -> Self {
        match value {
            RatingValue::Score(score) => Self::Score(score),
            RatingValue::Skipped => Self::Label(SKIPPED_LABEL.to_string()),
        }
    }
}

/// One rating tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub rater: String,
    pub target: String,
    pub topic: String,
    pub value: RatingValue,
}

/// What a rater sends in: target name → topic → value.
pub type RatingSubmission = BTreeMap<String, BTreeMap<String, RatingValue>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingLedger {
    entries: Vec<Rating>,
}

impl RatingLedger {
    /// Replaces every tuple previously recorded for `rater` with `tuples`.
    ///
    /// Tuples whose `rater` field differs from `rater` are dropped, as are repeated
    /// `(target, topic)` pairs after the first.
    pub fn submit(&mut self, rater: &str, tuples: Vec<Rating>) {
        self.entries.retain(|r| r.rater != rater);

        let mut seen = BTreeSet::new();
        for tuple in tuples {
            if tuple.rater != rater {
                tracing::warn!(rater, other = %tuple.rater, "dropping tuple with foreign rater");
                continue;
            }
            if seen.insert((tuple.target.clone(), tuple.topic.clone())) {
                self.entries.push(tuple);
            }
        }
    }

    /// Distinct raters with at least one tuple.
    pub fn submitted_raters(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|r| r.rater.as_str()).collect()
    }

    /// Fills every target × topic combination of each rater in `unsubmitted` with `SKIPPED`.
    ///
    /// Raters that already have tuples are left alone, so a partial submission is never
    /// overwritten. Returns the number of tuples inserted.
    pub fn auto_fill_skipped(
        &mut self,
        unsubmitted: &[String],
        players: &[String],
        topics: &[String],
    ) -> usize {
        let already: BTreeSet<String> = self
            .submitted_raters()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut inserted = 0;
        for rater in unsubmitted {
            if already.contains(rater) {
                continue;
            }
            for target in players.iter().filter(|t| *t != rater) {
                for topic in topics {
                    self.entries.push(Rating {
                        rater: rater.clone(),
                        target: target.clone(),
                        topic: topic.clone(),
                        value: RatingValue::Skipped,
                    });
                    inserted += 1;
                }
            }
        }
        inserted
    }

    pub fn entries(&self) -> &[Rating] {
        &self.entries
    }

    pub fn by_rater<'a>(&'a self, rater: &'a str) -> impl Iterator<Item = &'a Rating> + 'a {
        self.entries.iter().filter(move |r| r.rater == rater)
    }

    /// Tuples received by `target` on `topic`.
    pub fn received<'a>(
        &'a self,
        target: &'a str,
        topic: &'a str,
    ) -> impl Iterator<Item = &'a Rating> + 'a {
        self.entries
            .iter()
            .filter(move |r| r.target == target && r.topic == topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
