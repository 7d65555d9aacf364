use crate::{SentimentCategory, SentimentCount, SentimentDistribution};

// Unknown category labels still count toward the total but land in no
// bucket, so the output can sum below 100 when the backend sends labels
// outside the three known ones.
pub fn normalize_distribution(counts: &[SentimentCount]) -> SentimentDistribution {
    let total: u64 = counts.iter().map(|row| row.count).sum();
    if total == 0 {
        return SentimentDistribution::zero();
    }

    let bucket = |category: SentimentCategory| -> f64 {
        let matching: u64 = counts
            .iter()
            .filter(|row| SentimentCategory::from_str(&row.sentiment) == Some(category))
            .map(|row| row.count)
            .sum();
        100.0 * matching as f64 / total as f64
    };

    SentimentDistribution {
        positive: bucket(SentimentCategory::Positive),
        neutral: bucket(SentimentCategory::Neutral),
        negative: bucket(SentimentCategory::Negative),
    }
}
