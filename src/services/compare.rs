//! Compare service — group results by user prompt and explain what changed.
//!
//! DESIGN
//! ======
//! Pure functions, no I/O. Results sharing an identical `user_prompt` form a
//! group; each group is ordered newest-first and the two newest configs are
//! diffed field by field. Each tunable field has its own comparator in
//! `COMPARATORS`, which yields one English clause when the values differ.
//!
//! Delta bands are strict comparisons against the new-minus-old delta. The
//! trailing "else" band only sees small negative deltas because equal values
//! never reach a comparator.

use std::collections::HashMap;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::state::{ModelChoice, PromptConfig, TestResult};

const TEMPERATURE_BAND: f64 = 0.3;
const MAX_TOKENS_BAND: i64 = 100;
const MULTIPLE_PREFIX: &str = "Made multiple adjustments: ";

// =============================================================================
// TYPES
// =============================================================================

/// Rendered description of the differences between a group's two newest results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub changes: String,
    /// Names of the fields that differ, in render order.
    pub fields: Vec<&'static str>,
}

/// All results sharing one user prompt, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultGroup {
    pub prompt: String,
    pub results: Vec<TestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

// =============================================================================
// GROUPING
// =============================================================================

/// Partition `results` by user prompt.
///
/// Groups are ordered by their newest result, newest first. Unparseable
/// timestamps sort as oldest.
#[must_use]
pub fn group_results(results: &[TestResult]) -> Vec<ResultGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Vec<TestResult>> = Vec::new();

    for result in results {
        let slot = *index.entry(result.config.user_prompt.as_str()).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(result.clone());
    }

    let mut groups: Vec<ResultGroup> = buckets
        .into_iter()
        .map(|mut bucket| {
            sort_newest_first(&mut bucket);
            let comparison = match bucket.as_slice() {
                [newer, older, ..] => compare_configs(&older.config, &newer.config),
                _ => None,
            };
            ResultGroup { prompt: bucket[0].config.user_prompt.clone(), results: bucket, comparison }
        })
        .collect();

    groups.sort_by(|a, b| {
        let a_key = a.results.first().and_then(|r| timestamp_key(&r.timestamp));
        let b_key = b.results.first().and_then(|r| timestamp_key(&r.timestamp));
        b_key.cmp(&a_key)
    });
    groups
}

fn sort_newest_first(results: &mut [TestResult]) {
    results.sort_by(|a, b| timestamp_key(&b.timestamp).cmp(&timestamp_key(&a.timestamp)));
}

fn timestamp_key(timestamp: &str) -> Option<i128> {
    OffsetDateTime::parse(timestamp, &Rfc3339)
        .ok()
        .map(OffsetDateTime::unix_timestamp_nanos)
}

// =============================================================================
// DIFF
// =============================================================================

type Comparator = fn(&PromptConfig, &PromptConfig) -> Option<String>;

/// Field comparators in render order. Each receives `(older, newer)`.
const COMPARATORS: [(&str, Comparator); 6] = [
    ("model", compare_model),
    ("temperature", compare_temperature),
    ("maxTokens", compare_max_tokens),
    ("presencePenalty", compare_presence_penalty),
    ("frequencyPenalty", compare_frequency_penalty),
    ("stopSequence", compare_stop_sequence),
];

/// Describe how `newer` differs from `older`, or `None` if no tunable field changed.
#[must_use]
pub fn compare_configs(older: &PromptConfig, newer: &PromptConfig) -> Option<Comparison> {
    let (fields, clauses): (Vec<&'static str>, Vec<String>) = COMPARATORS
        .iter()
        .filter_map(|(name, comparator)| comparator(older, newer).map(|clause| (*name, clause)))
        .unzip();

    let changes = match clauses.len() {
        0 => return None,
        1 => clauses.into_iter().next()?,
        _ => format!("{MULTIPLE_PREFIX}{}", clauses.join("; ")),
    };
    Some(Comparison { changes, fields })
}

fn compare_model(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    if older.model == newer.model {
        return None;
    }
    Some(match newer.model {
        ModelChoice::Gpt4 => "Switched to GPT-4 for more nuanced reasoning and higher quality responses".to_string(),
        ModelChoice::Gpt35Turbo => "Switched to GPT-3.5 Turbo for faster responses with good quality".to_string(),
    })
}

#[allow(clippy::float_cmp)]
fn compare_temperature(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    let (old, new) = (older.temperature, newer.temperature);
    if old == new {
        return None;
    }
    let delta = new - old;
    Some(if delta > TEMPERATURE_BAND {
        format!("Increased temperature from {old} to {new}, making responses much more creative and diverse")
    } else if delta > 0.0 {
        format!("Slightly increased temperature from {old} to {new}, allowing slightly more varied responses")
    } else if delta < -TEMPERATURE_BAND {
        format!("Decreased temperature from {old} to {new}, making responses much more focused and deterministic")
    } else {
        format!("Slightly decreased temperature from {old} to {new}, making responses slightly more consistent")
    })
}

fn compare_max_tokens(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    let (old, new) = (older.max_tokens, newer.max_tokens);
    if old == new {
        return None;
    }
    let delta = i64::from(new) - i64::from(old);
    Some(if delta > MAX_TOKENS_BAND {
        format!("Increased max tokens from {old} to {new}, allowing significantly longer, more detailed responses")
    } else if delta > 0 {
        format!("Increased max tokens from {old} to {new}, allowing slightly more detailed responses")
    } else if delta < -MAX_TOKENS_BAND {
        format!("Reduced max tokens from {old} to {new}, forcing much more concise responses")
    } else {
        format!("Reduced max tokens from {old} to {new}, producing more condensed responses")
    })
}

#[allow(clippy::float_cmp)]
fn compare_presence_penalty(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    let (old, new) = (older.presence_penalty, newer.presence_penalty);
    if old == new {
        return None;
    }
    Some(if new > old {
        format!("Increased presence penalty from {old} to {new}, encouraging the model to explore new topics")
    } else {
        format!("Decreased presence penalty from {old} to {new}, letting the model stay on familiar topics")
    })
}

#[allow(clippy::float_cmp)]
fn compare_frequency_penalty(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    let (old, new) = (older.frequency_penalty, newer.frequency_penalty);
    if old == new {
        return None;
    }
    Some(if new > old {
        format!("Increased frequency penalty from {old} to {new}, reducing repetition of words and phrases")
    } else {
        format!("Decreased frequency penalty from {old} to {new}, allowing more repetition of words and phrases")
    })
}

fn compare_stop_sequence(older: &PromptConfig, newer: &PromptConfig) -> Option<String> {
    let (old, new) = (older.stop_sequence.as_str(), newer.stop_sequence.as_str());
    if old == new {
        return None;
    }
    Some(if old.is_empty() {
        format!("Added stop sequence \"{new}\", so output ends where it first appears")
    } else if new.is_empty() {
        format!("Removed stop sequence \"{old}\", so output runs until the token limit")
    } else {
        format!("Changed stop sequence from \"{old}\" to \"{new}\", changing where output is cut off")
    })
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
