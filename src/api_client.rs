use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::{
    DailyTrendRow, EngagementAverage, Period, Post, SentimentCategory, SentimentCount,
    TopNegativeRow, TopPositiveRow, TopPostSummary,
};

// Injected explicitly so the transformation core never touches ambient
// token state.
#[derive(Debug, Clone)]
pub enum ApiAuth {
    Bearer(String),
    Anonymous,
}

impl ApiAuth {
    pub fn from_env() -> Self {
        match env::var("PULSE_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => ApiAuth::Bearer(decode_token(token)),
            _ => ApiAuth::Anonymous,
        }
    }
}

fn decode_token(value: String) -> String {
    if value.contains('%') {
        match urlencoding::decode(&value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value,
        }
    } else {
        value
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_base: String,
    auth: ApiAuth,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageScores {
    #[serde(default)]
    pub avg_positive: String,
    #[serde(default)]
    pub avg_neutral: String,
    #[serde(default)]
    pub avg_negative: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentOverviewPayload {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub sentiment_distribution: Vec<SentimentCount>,
    #[serde(default)]
    pub average_scores: AverageScores,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPeriodPayload {
    #[serde(default)]
    pub daily_trends: Vec<DailyTrendRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentTrendsPayload {
    #[serde(default)]
    pub current_period: TrendPeriodPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationsPayload {
    #[serde(default)]
    pub average_engagement_by_sentiment: Vec<EngagementAverage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsOverviewPayload {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub comment_sentiment_distribution: Vec<SentimentCount>,
    #[serde(default)]
    pub top_positive_comments_posts: Vec<TopPositiveRow>,
    #[serde(default)]
    pub top_negative_comments_posts: Vec<TopNegativeRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default)]
    pub total_reactions: String,
    #[serde(default)]
    pub total_comments: String,
    #[serde(default)]
    pub total_shares: String,
    #[serde(default)]
    pub total_video_views: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    pub page: u32,
    pub page_size: u32,
    pub order_by: String,
    pub search: String,
}

impl ApiClient {
    pub fn from_config(config: &DashboardConfig, auth: ApiAuth) -> Result<Self, String> {
        Self::new(
            config.api.base_url.clone(),
            Duration::from_millis(config.api.timeout_ms),
            auth,
        )
    }

    pub fn new(api_base: String, timeout: Duration, auth: ApiAuth) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build api client: {}", err))?;
        Ok(Self {
            client,
            api_base,
            auth,
        })
    }

    pub async fn sentiment_overview(&self) -> Result<SentimentOverviewPayload, String> {
        self.get_json("/sentiment/overview", &[]).await
    }

    pub async fn sentiment_trends(&self, period: Period) -> Result<SentimentTrendsPayload, String> {
        self.get_json("/sentiment/trends", &[("period", period.query_value().to_string())])
            .await
    }

    pub async fn top_posts(
        &self,
        sentiment: SentimentCategory,
        limit: usize,
    ) -> Result<Vec<TopPostSummary>, String> {
        self.get_json(
            "/sentiment/posts/top",
            &[
                ("sentiment", sentiment.label().to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn sentiment_correlations(&self) -> Result<CorrelationsPayload, String> {
        self.get_json("/sentiment/correlations", &[]).await
    }

    pub async fn comments_overview(&self) -> Result<CommentsOverviewPayload, String> {
        self.get_json("/sentiment/comments/overview", &[]).await
    }

    pub async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, String> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("pageSize", query.page_size.to_string()),
            ("orderBy", query.order_by.clone()),
        ];
        if !query.search.is_empty() {
            params.push(("search", query.search.clone()));
        }
        self.get_json("/posts", &params).await
    }

    pub async fn latest_posts(&self) -> Result<Vec<Post>, String> {
        self.get_json("/posts/latest", &[]).await
    }

    pub async fn stats(&self) -> Result<StatsPayload, String> {
        self.get_json("/stats", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, String> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        debug!(url = %url, "api request");

        let mut request = self.client.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let ApiAuth::Bearer(token) = &self.auth {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|err| format!("api request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!(url = %url, "api rejected credentials");
            }
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("api error: {}", status));
            }
            return Err(format!("api error: {} {}", status, detail));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| format!("api response parse failed: {}", err))
    }
}
