pub mod api_client;
pub mod config;
pub mod search;
pub mod transform;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "positive" | "pos" => Some(SentimentCategory::Positive),
            "neutral" | "neu" => Some(SentimentCategory::Neutral),
            "negative" | "neg" => Some(SentimentCategory::Negative),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "7d" | "week" => Some(Period::Week),
            "30d" | "month" => Some(Period::Month),
            "90d" | "quarter" => Some(Period::Quarter),
            _ => None,
        }
    }

    pub fn query_value(self) -> &'static str {
        match self {
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Quarter => "90d",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentCount {
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentDistribution {
    pub fn zero() -> Self {
        Self {
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendRow {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub avg_positive: String,
    #[serde(default)]
    pub avg_neutral: String,
    #[serde(default)]
    pub avg_negative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementAverage {
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub avg_reactions: String,
    #[serde(default)]
    pub avg_comments: String,
    #[serde(default)]
    pub avg_shares: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMetric {
    pub metric: String,
    pub positive_correlation: f64,
    pub negative_correlation: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPositiveRow {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub positive_comments_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNegativeRow {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub negative_comments_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPostRanked {
    pub post_id: String,
    pub positive_comment_count: u64,
    pub negative_comment_count: u64,
    pub total_comment_count: u64,
    pub message: String,
    pub username: String,
    pub post_created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetails {
    pub message: String,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub post_created_at: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub message_text: Option<String>,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub reaction_count: u64,
    #[serde(default)]
    pub video_view_count: u64,
    #[serde(default)]
    pub permalink: Option<String>,
}

impl Post {
    pub fn details(&self) -> PostDetails {
        PostDetails {
            message: self.message_text.clone().unwrap_or_default(),
            username: self.username.clone(),
            created_at: self.post_created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPostSummary {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub post_created_at: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub score: f64,
}

pub fn format_number(value: f64) -> String {
    let value = value.max(0.0);
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

// Numeric strings from the API parse leniently; anything malformed is 0.
pub fn parse_metric(value: &str) -> f64 {
    let parsed = value.trim().parse::<f64>().unwrap_or(0.0);
    if parsed.is_nan() {
        0.0
    } else {
        parsed
    }
}
