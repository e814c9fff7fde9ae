//! Per-player, per-topic statistics over a rating ledger.

use super::model::Session;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of the valid scores, or a marker for "nothing to average".
///
/// `NoData` is kept distinct from a zero average because zero can be a legitimate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TopicAverage {
    Score(f64),
    NoData,
}

impl TopicAverage {
    fn mean(values: &[f64]) -> Self {
        if values.is_empty() {
            Self::NoData
        } else {
            Self::Score(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(*v),
            Self::NoData => None,
        }
    }
}

/// Aggregate results for one player. Carries no rater identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResults {
    pub participant: String,
    pub topic_averages: BTreeMap<String, TopicAverage>,
    pub total_average: TopicAverage,
    pub skipped_counts: BTreeMap<String, usize>,
}

/// Computes the results received by `player` across every topic of the session.
pub fn player_results(session: &Session, player: &str) -> PlayerResults {
    let mut topic_averages = BTreeMap::new();
    let mut skipped_counts = BTreeMap::new();

    for topic in &session.topics {
        let mut valid = Vec::new();
        let mut skipped = 0;
        for rating in session.ratings.received(player, topic) {
            match rating.value.score() {
                Some(score) => valid.push(f64::from(score)),
                None => skipped += 1,
            }
        }
        topic_averages.insert(topic.clone(), TopicAverage::mean(&valid));
        skipped_counts.insert(topic.clone(), skipped);
    }

    let numeric: Vec<f64> = topic_averages
        .values()
        .filter_map(TopicAverage::value)
        .collect();

    PlayerResults {
        participant: player.to_string(),
        total_average: TopicAverage::mean(&numeric),
        topic_averages,
        skipped_counts,
    }
}

/// Results for every player, in roster order.
pub fn all_results(session: &Session) -> Vec<PlayerResults> {
    session
        .players()
        .iter()
        .map(|player| player_results(session, player))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::SessionMode;
    use crate::session::model::test_support::session;
    use crate::session::rating::{Rating, RatingValue};

    fn rate(s: &mut Session, rater: &str, tuples: &[(&str, &str, RatingValue)]) {
        let tuples = tuples
            .iter()
            .map(|(target, topic, value)| Rating {
                rater: rater.into(),
                target: target.to_string(),
                topic: topic.to_string(),
                value: *value,
            })
            .collect();
        s.ratings.submit(rater, tuples);
    }

    #[test]
    fn test_topic_average_excludes_skipped() {
        let mut s = session(&["a", "b", "c"], &["x", "y"], SessionMode::Anonymous);
        rate(&mut s, "b", &[("a", "x", RatingValue::Score(4)), ("a", "y", RatingValue::Skipped)]);
        rate(&mut s, "c", &[("a", "x", RatingValue::Score(8)), ("a", "y", RatingValue::Skipped)]);

        let results = player_results(&s, "a");
        assert_eq!(results.topic_averages["x"], TopicAverage::Score(6.0));
        assert_eq!(results.topic_averages["y"], TopicAverage::NoData);
        assert_eq!(results.skipped_counts["x"], 0);
        assert_eq!(results.skipped_counts["y"], 2);
        assert_eq!(results.total_average, TopicAverage::Score(6.0));
    }

    #[test]
    fn test_total_average_is_no_data_without_scores() {
        let s = session(&["a", "b"], &["x"], SessionMode::Game);
        let results = player_results(&s, "a");
        assert_eq!(results.topic_averages["x"], TopicAverage::NoData);
        assert_eq!(results.total_average, TopicAverage::NoData);
    }

    #[test]
    fn test_total_average_is_mean_of_topic_averages() {
        let mut s = session(&["a", "b", "c"], &["x", "y"], SessionMode::Public);
        rate(&mut s, "b", &[("a", "x", RatingValue::Score(2)), ("a", "y", RatingValue::Score(9))]);
        rate(&mut s, "c", &[("a", "x", RatingValue::Score(4))]);

        let results = player_results(&s, "a");
        // x averages 3, y averages 9
        assert_eq!(results.total_average, TopicAverage::Score(6.0));
    }

    #[test]
    fn test_no_data_serializes_as_marker() {
        let json = serde_json::to_value(TopicAverage::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "no_data" }));
        let json = serde_json::to_value(TopicAverage::Score(0.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "score", "value": 0.0 }));
    }

    #[test]
    fn test_all_results_in_roster_order() {
        let s = session(&["c", "a", "b"], &["x"], SessionMode::Game);
        let order: Vec<_> = all_results(&s).into_iter().map(|r| r.participant).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
