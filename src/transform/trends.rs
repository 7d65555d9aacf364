use std::collections::HashMap;

use crate::{parse_metric, DailyTrendRow, SentimentCategory, TrendPoint};

// The backend emits one row per (date, sentiment bucket); this keeps only
// the most recently seen row for each date (last wins).
pub fn aggregate_daily_trends(rows: &[DailyTrendRow]) -> Vec<TrendPoint> {
    let mut by_date: HashMap<String, TrendPoint> = HashMap::new();

    for row in rows {
        let positive = parse_metric(&row.avg_positive);
        by_date.insert(
            row.date.clone(),
            TrendPoint {
                date: row.date.clone(),
                positive,
                neutral: parse_metric(&row.avg_neutral),
                negative: parse_metric(&row.avg_negative),
                avg_score: positive / 100.0,
            },
        );
    }

    sorted_by_date(by_date)
}

// Bucket-merging variant: each row only fills the bucket named by its own
// sentiment label, keeping values already seen for the same date. Rows with
// an unknown label fall back to full overwrite.
pub fn aggregate_daily_trends_merged(rows: &[DailyTrendRow]) -> Vec<TrendPoint> {
    let mut by_date: HashMap<String, TrendPoint> = HashMap::new();

    for row in rows {
        let point = by_date.entry(row.date.clone()).or_insert_with(|| TrendPoint {
            date: row.date.clone(),
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
            avg_score: 0.0,
        });

        match SentimentCategory::from_str(&row.sentiment) {
            Some(SentimentCategory::Positive) => point.positive = parse_metric(&row.avg_positive),
            Some(SentimentCategory::Neutral) => point.neutral = parse_metric(&row.avg_neutral),
            Some(SentimentCategory::Negative) => point.negative = parse_metric(&row.avg_negative),
            None => {
                point.positive = parse_metric(&row.avg_positive);
                point.neutral = parse_metric(&row.avg_neutral);
                point.negative = parse_metric(&row.avg_negative);
            }
        }
        point.avg_score = point.positive / 100.0;
    }

    sorted_by_date(by_date)
}

fn sorted_by_date(by_date: HashMap<String, TrendPoint>) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = by_date.into_values().collect();
    // ISO dates sort chronologically as strings.
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}
