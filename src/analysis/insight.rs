use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::features::AcousticFeatures;
use super::scoring::{VoiceScores, QUIET_RMS};

/// One entry of the insight table.
pub struct InsightRule {
    pub id: &'static str,
    /// Higher priorities are checked first; equal priorities keep table order.
    pub priority: u8,
    pub predicate: fn(&AcousticFeatures, &VoiceScores) -> bool,
    pub message: &'static str,
}

impl fmt::Debug for InsightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightRule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Display category for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Warning,
    Positive,
    Neutral,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Warning => "warning",
            Category::Positive => "positive",
            Category::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

/// Shorter recordings than this get the "very short" insight.
const SHORT_RECORDING_SECS: f32 = 5.0;

/// Minimum voiced ratio before the recording counts as containing a voice.
const MIN_VOICED_RATIO: f32 = 0.1;

/// Rule table, highest priority first. The last entry is the catch-all.
pub static INSIGHT_RULES: [InsightRule; 9] = [
    InsightRule {
        id: "too_quiet",
        priority: 100,
        predicate: too_quiet,
        message: "The recording was very quiet, so these readings may not reflect your voice. \
                  Try again a little closer to the microphone.",
    },
    InsightRule {
        id: "no_voice",
        priority: 95,
        predicate: no_voice,
        message: "No clear voice was detected. Try speaking steadily for the whole recording.",
    },
    InsightRule {
        id: "too_short",
        priority: 90,
        predicate: too_short,
        message: "The recording was very short. A longer sample gives steadier readings.",
    },
    InsightRule {
        id: "high_tension",
        priority: 80,
        predicate: high_tension,
        message: "Your voice shows a tension-like signal, with more pitch movement and \
                  irregularity than usual. A few slow breaths before speaking may help.",
    },
    InsightRule {
        id: "high_energy",
        priority: 70,
        predicate: high_energy,
        message: "Your voice carries higher energy than usual: louder and brighter.",
    },
    InsightRule {
        id: "low_energy",
        priority: 70,
        predicate: low_energy,
        message: "Your voice carries lower energy than usual. This often happens when \
                  tired or speaking softly.",
    },
    InsightRule {
        id: "noisy",
        priority: 60,
        predicate: noisy,
        message: "The signal contains more noise than usual. Background sound or a \
                  breathy voice can cause this.",
    },
    InsightRule {
        id: "clear_projected",
        priority: 50,
        predicate: clear_projected,
        message: "Your voice sounds clear and well-projected.",
    },
    InsightRule {
        id: "typical",
        priority: 10,
        predicate: always,
        message: "Your voice readings are within a typical range.",
    },
];

fn too_quiet(f: &AcousticFeatures, _: &VoiceScores) -> bool {
    f.rms < QUIET_RMS
}

fn no_voice(f: &AcousticFeatures, _: &VoiceScores) -> bool {
    f.voiced_ratio < MIN_VOICED_RATIO
}

fn too_short(f: &AcousticFeatures, _: &VoiceScores) -> bool {
    f.duration_seconds < SHORT_RECORDING_SECS
}

fn high_tension(_: &AcousticFeatures, s: &VoiceScores) -> bool {
    s.tension > 75
}

fn high_energy(_: &AcousticFeatures, s: &VoiceScores) -> bool {
    s.energy > 80
}

fn low_energy(_: &AcousticFeatures, s: &VoiceScores) -> bool {
    s.energy < 25
}

fn noisy(_: &AcousticFeatures, s: &VoiceScores) -> bool {
    s.clarity < 35
}

fn clear_projected(_: &AcousticFeatures, s: &VoiceScores) -> bool {
    s.clarity > 80 && s.energy > 50
}

fn always(_: &AcousticFeatures, _: &VoiceScores) -> bool {
    true
}

/// Rules in evaluation order: descending priority, ties in table order.
pub fn rules_by_priority() -> Vec<&'static InsightRule> {
    let mut rules: Vec<&'static InsightRule> = INSIGHT_RULES.iter().collect();
    // sort_by_key is stable, so equal priorities keep declaration order
    rules.sort_by_key(|r| Reverse(r.priority));
    rules
}

/// First rule whose predicate holds.
pub fn matching_rule(f: &AcousticFeatures, s: &VoiceScores) -> &'static InsightRule {
    let catch_all = &INSIGHT_RULES[INSIGHT_RULES.len() - 1];
    rules_by_priority()
        .into_iter()
        .find(|rule| (rule.predicate)(f, s))
        .unwrap_or(catch_all)
}

/// Insight message for a set of features and scores.
pub fn generate(f: &AcousticFeatures, s: &VoiceScores) -> &'static str {
    matching_rule(f, s).message
}

/// Display category. Independent of the rule traversal:
///
///   warning  — too quiet, no voice, or too short
///   positive — clarity > 75, energy > 50, tension < 50
///   neutral  — everything else
pub fn category(f: &AcousticFeatures, s: &VoiceScores) -> Category {
    if f.rms < QUIET_RMS
        || f.voiced_ratio < MIN_VOICED_RATIO
        || f.duration_seconds < SHORT_RECORDING_SECS
    {
        Category::Warning
    } else if s.clarity > 75 && s.energy > 50 && s.tension < 50 {
        Category::Positive
    } else {
        Category::Neutral
    }
}
