use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::Display;

use super::{ModerationAction, ModerationOutcome, SentimentLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Post,
    Opportunity,
}

/// One moderated item fed into the aggregate
#[derive(Debug, Clone, Copy)]
pub struct ContentSample<'a> {
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub outcome: &'a ModerationOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub count: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub average_score: f64,
    pub flagged: usize,
    pub rejected: usize,
    pub by_kind: BTreeMap<ContentKind, usize>,
    pub by_day: BTreeMap<NaiveDate, DaySummary>,
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = scores.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Aggregate moderation outcomes, optionally only those created at or after `since`.
pub fn aggregate<'a>(
    samples: impl IntoIterator<Item = ContentSample<'a>>,
    since: Option<DateTime<Utc>>,
) -> SentimentSummary {
    let samples: Vec<ContentSample<'a>> = samples
        .into_iter()
        .filter(|s| since.map_or(true, |t| s.created_at >= t))
        .collect();

    let labels = samples.iter().map(|s| s.outcome.sentiment.label).counts();
    let actions = samples.iter().map(|s| s.outcome.action).counts();

    let by_day = samples
        .iter()
        .into_group_map_by(|s| s.created_at.date_naive())
        .into_iter()
        .map(|(day, items)| {
            let summary = DaySummary {
                count: items.len(),
                average_score: mean(items.iter().map(|s| s.outcome.sentiment.score)),
            };
            (day, summary)
        })
        .collect();

    SentimentSummary {
        total: samples.len(),
        positive: labels.get(&SentimentLabel::Positive).copied().unwrap_or(0),
        neutral: labels.get(&SentimentLabel::Neutral).copied().unwrap_or(0),
        negative: labels.get(&SentimentLabel::Negative).copied().unwrap_or(0),
        average_score: mean(samples.iter().map(|s| s.outcome.sentiment.score)),
        flagged: actions.get(&ModerationAction::Flag).copied().unwrap_or(0),
        rejected: actions.get(&ModerationAction::Reject).copied().unwrap_or(0),
        by_kind: samples.iter().map(|s| s.kind).counts().into_iter().collect(),
        by_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::Sentiment;
    use chrono::TimeZone;

    fn outcome(score: f64, label: SentimentLabel, action: ModerationAction) -> ModerationOutcome {
        ModerationOutcome {
            sentiment: Sentiment { score, label, positive_hits: 0, negative_hits: 0 },
            action,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn empty_input_gives_zeroes() {
        let summary = aggregate(Vec::new(), None);
        assert_eq!(summary, SentimentSummary::default());
    }

    #[test]
    fn aggregates_labels_actions_and_days() {
        let good = outcome(0.6, SentimentLabel::Positive, ModerationAction::Approve);
        let meh = outcome(0.0, SentimentLabel::Neutral, ModerationAction::Approve);
        let bad = outcome(-0.9, SentimentLabel::Negative, ModerationAction::Flag);
        let day1 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        let samples = vec![
            ContentSample { kind: ContentKind::Post, created_at: day1, outcome: &good },
            ContentSample { kind: ContentKind::Post, created_at: day1, outcome: &bad },
            ContentSample { kind: ContentKind::Opportunity, created_at: day2, outcome: &meh },
        ];
        let summary = aggregate(samples.clone(), None);

        assert_eq!(summary.total, 3);
        assert_eq!((summary.positive, summary.neutral, summary.negative), (1, 1, 1));
        assert_eq!(summary.flagged, 1);
        assert_eq!(summary.rejected, 0);
        assert!((summary.average_score - (-0.1)).abs() < 1e-9);
        assert_eq!(summary.by_kind.get(&ContentKind::Post), Some(&2));
        assert_eq!(summary.by_day.len(), 2);
        assert!((summary.by_day[&day1.date_naive()].average_score - (-0.15)).abs() < 1e-9);

        let recent = aggregate(samples, Some(day2));
        assert_eq!(recent.total, 1);
        assert_eq!(recent.neutral, 1);
    }
}
