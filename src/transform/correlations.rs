use crate::{parse_metric, CorrelationMetric, EngagementAverage, SentimentCategory};

// The synthetic "total engagement" metric is a fixed placeholder, not a
// computed statistic; the fallback pair applies when no positive-category
// row is present.
pub const TOTAL_ENGAGEMENT_PLACEHOLDER: (f64, f64) = (0.85, -0.15);
pub const TOTAL_ENGAGEMENT_FALLBACK: (f64, f64) = (0.5, -0.15);

struct MetricAverages {
    reactions: f64,
    comments: f64,
    shares: f64,
}

impl MetricAverages {
    fn zero() -> Self {
        Self {
            reactions: 0.0,
            comments: 0.0,
            shares: 0.0,
        }
    }

    fn from_row(row: &EngagementAverage) -> Self {
        Self {
            reactions: parse_metric(&row.avg_reactions),
            comments: parse_metric(&row.avg_comments),
            shares: parse_metric(&row.avg_shares),
        }
    }
}

// Output order is fixed: reactions, comments, shares, total engagement.
pub fn estimate_correlations(averages: &[EngagementAverage]) -> Vec<CorrelationMetric> {
    let find = |category: SentimentCategory| {
        averages
            .iter()
            .find(|row| SentimentCategory::from_str(&row.sentiment) == Some(category))
    };

    let positive_row = find(SentimentCategory::Positive);
    let positive = positive_row
        .map(MetricAverages::from_row)
        .unwrap_or_else(MetricAverages::zero);
    let neutral = find(SentimentCategory::Neutral)
        .map(MetricAverages::from_row)
        .unwrap_or_else(MetricAverages::zero);

    let mut metrics = vec![
        relative_metric(
            "Reactions",
            positive.reactions,
            neutral.reactions,
            "Relative reaction average of positive posts against the neutral baseline",
        ),
        relative_metric(
            "Comments",
            positive.comments,
            neutral.comments,
            "Relative comment average of positive posts against the neutral baseline",
        ),
        relative_metric(
            "Shares",
            positive.shares,
            neutral.shares,
            "Relative share average of positive posts against the neutral baseline",
        ),
    ];

    let (placeholder_positive, placeholder_negative) = if positive_row.is_some() {
        TOTAL_ENGAGEMENT_PLACEHOLDER
    } else {
        TOTAL_ENGAGEMENT_FALLBACK
    };
    metrics.push(CorrelationMetric {
        metric: "Total engagement".to_string(),
        positive_correlation: placeholder_positive,
        negative_correlation: placeholder_negative,
        description: "Heuristic placeholder, not derived from the engagement averages".to_string(),
    });

    metrics
}

fn relative_metric(name: &str, positive: f64, neutral: f64, description: &str) -> CorrelationMetric {
    let relative_delta = if neutral > 0.0 {
        (positive - neutral) / neutral * 100.0
    } else {
        0.0
    };

    CorrelationMetric {
        metric: name.to_string(),
        positive_correlation: relative_delta.max(0.0) / 100.0,
        negative_correlation: relative_delta.min(0.0) / 100.0,
        description: description.to_string(),
    }
}
