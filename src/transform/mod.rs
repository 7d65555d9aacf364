pub mod correlations;
pub mod distribution;
pub mod top_posts;
pub mod trends;

pub use correlations::{
    estimate_correlations, TOTAL_ENGAGEMENT_FALLBACK, TOTAL_ENGAGEMENT_PLACEHOLDER,
};
pub use distribution::normalize_distribution;
pub use top_posts::{merge_top_posts, PostLookup};
pub use trends::{aggregate_daily_trends, aggregate_daily_trends_merged};
