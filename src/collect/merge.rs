use crate::types::config::Override;
use crate::types::repository::Record;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const SCORE_KEY: &str = "score";
pub const MODERATED_SCORE_KEY: &str = "moderated_score";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    Scored(f64),
    NoScore,
}

impl ScoreOutcome {
    pub fn of(record: &Record) -> Self {
        match record.get(SCORE_KEY).and_then(Value::as_f64) {
            Some(score) => Self::Scored(score),
            None => Self::NoScore,
        }
    }

    pub fn moderate(self, multiplier: f64) -> Self {
        match self {
            Self::Scored(score) => Self::Scored(score * multiplier),
            Self::NoScore => Self::NoScore,
        }
    }
}

/// Overlays each override onto the record of the same name, appends overrides
/// without a fetched record, and sets `moderated_score` wherever a score exists.
pub fn merge(records: Vec<Record>, overrides: &[Override]) -> Vec<Record> {
    let by_name: HashMap<&str, &Override> = overrides
        .iter()
        .map(|entry| (entry.name.as_str(), entry))
        .collect();
    let mut matched = HashSet::new();
    let mut merged = Vec::with_capacity(records.len() + overrides.len());

    for mut record in records {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default();
        let multiplier = match by_name.get(name.as_str()) {
            Some(entry) => {
                debug!("applying override for {name}");
                matched.insert(name);
                overlay(&mut record, entry);
                entry.multiplier()
            }
            None => 1.0,
        };
        moderate(&mut record, multiplier);
        merged.push(record);
    }

    for entry in overrides {
        if matched.contains(&entry.name) {
            continue;
        }
        debug!("override {} has no forge record; adding it as-is", entry.name);
        let mut record = entry.fields.clone();
        record
            .entry("name".to_string())
            .or_insert_with(|| Value::String(entry.name.clone()));
        moderate(&mut record, entry.multiplier());
        merged.push(record);
    }

    merged
}

fn overlay(record: &mut Record, entry: &Override) {
    for (key, value) in &entry.fields {
        record.insert(key.clone(), value.clone());
    }
}

fn moderate(record: &mut Record, multiplier: f64) {
    if let ScoreOutcome::Scored(moderated) = ScoreOutcome::of(record).moderate(multiplier) {
        record.insert(MODERATED_SCORE_KEY.to_string(), Value::from(moderated));
    }
}

/// Stable sort by descending `score`; records without a score go last.
pub fn sort_by_score(records: &mut [Record]) {
    records.sort_by(|a, b| match (ScoreOutcome::of(a), ScoreOutcome::of(b)) {
        (ScoreOutcome::Scored(x), ScoreOutcome::Scored(y)) => y.total_cmp(&x),
        (ScoreOutcome::Scored(_), ScoreOutcome::NoScore) => Ordering::Less,
        (ScoreOutcome::NoScore, ScoreOutcome::Scored(_)) => Ordering::Greater,
        (ScoreOutcome::NoScore, ScoreOutcome::NoScore) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture should be an object, got {other}"),
        }
    }

    fn override_of(name: &str, fields: Value) -> Override {
        Override::from_fields(name, record(fields)).expect("override fixture should parse")
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn multiplier_scales_score_and_keeps_fields() {
        let fetched = record(json!({
            "name": "roary",
            "description": "pan genomes",
            "stargazers_count": 7,
            "score": 1.5
        }));
        let merged = merge(
            vec![fetched],
            &[override_of("roary", json!({"score_multiplier": 2}))],
        );
        assert_eq!(merged.len(), 1);
        let roary = &merged[0];
        assert_eq!(roary.get(MODERATED_SCORE_KEY), Some(&json!(3.0)));
        assert_eq!(roary.get("score"), Some(&json!(1.5)));
        assert_eq!(roary.get("description"), Some(&json!("pan genomes")));
        assert_eq!(roary.get("stargazers_count"), Some(&json!(7)));
        assert_eq!(roary.get("score_multiplier"), Some(&json!(2)));
    }

    #[test]
    fn override_fields_win_field_by_field() {
        let fetched = record(json!({
            "name": "ariba",
            "description": "",
            "homepage": null,
            "score": 2.0
        }));
        let merged = merge(
            vec![fetched],
            &[override_of(
                "ariba",
                json!({"description": "Curated blurb", "tags": ["amr"]}),
            )],
        );
        let ariba = &merged[0];
        assert_eq!(ariba.get("description"), Some(&json!("Curated blurb")));
        assert_eq!(ariba.get("tags"), Some(&json!(["amr"])));
        assert_eq!(ariba.get("homepage"), Some(&Value::Null));
        assert_eq!(ariba.get(MODERATED_SCORE_KEY), Some(&json!(2.0)));
    }

    #[test]
    fn unmatched_override_becomes_its_own_record() {
        let merged = merge(
            vec![record(json!({"name": "roary", "score": 1.0}))],
            &[override_of(
                "artemis",
                json!({"description": "Genome browser", "html_url": "https://example/artemis"}),
            )],
        );
        assert_eq!(merged.len(), 2);
        let artemis = &merged[1];
        assert_eq!(
            artemis,
            &record(json!({
                "name": "artemis",
                "description": "Genome browser",
                "html_url": "https://example/artemis"
            }))
        );
        assert!(!artemis.contains_key(MODERATED_SCORE_KEY));
    }

    #[test]
    fn unmatched_override_keeps_its_multiplier_field() {
        let merged = merge(
            vec![],
            &[override_of(
                "artemis",
                json!({"score_multiplier": 2, "description": "Genome browser"}),
            )],
        );
        assert_eq!(
            merged,
            vec![record(json!({
                "name": "artemis",
                "description": "Genome browser",
                "score_multiplier": 2
            }))]
        );
    }

    #[test]
    fn unmatched_override_with_score_is_moderated() {
        let merged = merge(
            vec![],
            &[override_of("artemis", json!({"score": 2.5, "score_multiplier": 0.5}))],
        );
        assert_eq!(merged[0].get(MODERATED_SCORE_KEY), Some(&json!(1.25)));
    }

    #[test]
    fn records_without_override_get_unit_multiplier() {
        let merged = merge(vec![record(json!({"name": "roary", "score": 0.75}))], &[]);
        assert_eq!(merged[0].get(MODERATED_SCORE_KEY), Some(&json!(0.75)));
    }

    #[test]
    fn score_outcome_propagates_absence() {
        assert_eq!(
            ScoreOutcome::of(&record(json!({"name": "x"}))).moderate(4.0),
            ScoreOutcome::NoScore
        );
        assert_eq!(
            ScoreOutcome::of(&record(json!({"score": 1.5}))).moderate(2.0),
            ScoreOutcome::Scored(3.0)
        );
    }

    #[test]
    fn sort_orders_by_descending_score() {
        let mut records = vec![
            record(json!({"name": "low", "score": 0.2})),
            record(json!({"name": "unscored"})),
            record(json!({"name": "high", "score": 4.1})),
            record(json!({"name": "mid", "score": 1.7})),
        ];
        sort_by_score(&mut records);
        assert_eq!(names(&records), vec!["high", "mid", "low", "unscored"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut records = vec![
            record(json!({"name": "first", "score": 1.0})),
            record(json!({"name": "top", "score": 2.0})),
            record(json!({"name": "second", "score": 1.0})),
        ];
        sort_by_score(&mut records);
        assert_eq!(names(&records), vec!["top", "first", "second"]);
    }
}
