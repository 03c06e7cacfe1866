//! Field completion rates
//!
//! Derived at read time from a bounded sample of submissions, not kept
//! as a stored counter. Callers decide how large the sample is; the
//! dashboard uses the most recent page of submissions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completion percentage for one field id across a submission sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCompletion {
    pub field_id: String,
    pub rate: f64,
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Percentage of sampled submissions in which each observed field id is
/// present and non-empty. Field ids are the union over the sample, so a
/// field added after early submissions still shows up with a low rate.
pub fn field_completion<'a, I>(sample: I) -> Vec<FieldCompletion>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let sample: Vec<&Map<String, Value>> = sample.into_iter().collect();
    if sample.is_empty() {
        return Vec::new();
    }

    let mut field_ids: Vec<&str> = Vec::new();
    for data in &sample {
        for key in data.keys() {
            if !field_ids.contains(&key.as_str()) {
                field_ids.push(key);
            }
        }
    }

    let total = sample.len() as f64;
    field_ids
        .into_iter()
        .map(|field_id| {
            let filled = sample
                .iter()
                .filter(|data| data.get(field_id).map(is_filled).unwrap_or(false))
                .count();
            FieldCompletion {
                field_id: field_id.to_string(),
                rate: filled as f64 / total * 100.0,
            }
        })
        .collect()
}
