use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::config::ModerationConfig;

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "amazing", "awesome", "love", "loved", "helpful", "thanks",
    "thank", "grateful", "proud", "happy", "inspiring", "support", "supportive", "opportunity",
    "success", "successful", "congratulations", "welcome", "beautiful", "strong", "community",
    "win", "progress", "hope", "celebrate",
];

const NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "hated", "angry", "useless", "worst",
    "stupid", "disgusting", "fraud", "fake", "liar", "garbage", "trash", "ugly", "sad",
    "scared", "threat", "attack", "abuse", "racist", "idiot", "fail", "failure", "broken",
];

/// A negator flips the next sentiment word, however far away
const NEGATORS: &[&str] = &["not", "no", "never"];

/// Scores between these bounds are neutral
const LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// In [-1, 1]
    pub score: f64,
    pub label: SentimentLabel,
    pub positive_hits: u32,
    pub negative_hits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModerationAction {
    Approve,
    Flag,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationOutcome {
    pub sentiment: Sentiment,
    pub action: ModerationAction,
    pub reasons: Vec<String>,
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Lexicon sentiment score of `text`.
pub fn score(text: &str) -> Sentiment {
    let tokens = tokenize(text);
    let mut positive_hits = 0u32;
    let mut negative_hits = 0u32;
    let mut negated = false;

    for token in &tokens {
        let token = token.as_str();
        if NEGATORS.contains(&token) {
            negated = true;
            continue;
        }
        let polarity = if POSITIVE.contains(&token) {
            1
        } else if NEGATIVE.contains(&token) {
            -1
        } else {
            continue;
        };
        let polarity = if std::mem::take(&mut negated) { -polarity } else { polarity };
        if polarity > 0 {
            positive_hits += 1;
        } else {
            negative_hits += 1;
        }
    }

    let score = if tokens.is_empty() {
        0.0
    } else {
        ((positive_hits as f64 - negative_hits as f64) / (tokens.len() as f64).sqrt()).clamp(-1.0, 1.0)
    };
    let label = if score > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if score < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment { score, label, positive_hits, negative_hits }
}

/// Applies blocked terms and the flag threshold on top of the sentiment score
#[derive(Debug, Clone)]
pub struct Moderator {
    flag_threshold: f64,
    /// Each term tokenized, so multi-word terms match as a token run
    blocked_terms: Vec<Vec<String>>,
}

impl Moderator {
    pub fn new(cfg: &ModerationConfig) -> Self {
        Self {
            flag_threshold: cfg.flag_threshold,
            blocked_terms: cfg
                .blocked_terms
                .iter()
                .map(|t| tokenize(t))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn moderate(&self, text: &str) -> ModerationOutcome {
        let sentiment = score(text);
        let mut reasons = Vec::new();

        let tokens = tokenize(text);
        let mut blocked: Vec<String> = self
            .blocked_terms
            .iter()
            .filter(|term| tokens.windows(term.len()).any(|w| w == term.as_slice()))
            .map(|term| term.join(" "))
            .collect();
        blocked.sort();
        blocked.dedup();

        let action = if !blocked.is_empty() {
            reasons.push(format!("blocked terms: {}", blocked.join(", ")));
            ModerationAction::Reject
        } else if sentiment.score <= self.flag_threshold {
            reasons.push(format!(
                "sentiment {:.2} at or below threshold {:.2}",
                sentiment.score, self.flag_threshold
            ));
            ModerationAction::Flag
        } else {
            ModerationAction::Approve
        };

        debug!(score = sentiment.score, action = %action, "content moderated");
        ModerationOutcome { sentiment, action, reasons }
    }
}
