use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pulse_analytics::api_client::{ApiAuth, ApiClient};
use pulse_analytics::config::DashboardConfig;
use pulse_analytics::search::SearchSession;
use pulse_analytics::transform::{
    aggregate_daily_trends, aggregate_daily_trends_merged, estimate_correlations,
    merge_top_posts, normalize_distribution,
};
use pulse_analytics::{
    format_float, format_number, format_percent, parse_metric, Period, PostDetails,
    SentimentCategory,
};

#[derive(Parser)]
#[command(name = "pulse-analytics", about = "Social media sentiment analytics")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Overview,
    Trends(TrendsArgs),
    TopPosts(TopPostsArgs),
    Correlations,
    Comments,
    Posts(PostsArgs),
    Stats,
    Latest,
    InitConfig,
}

#[derive(Args, Debug, Clone)]
struct TrendsArgs {
    #[arg(long, default_value = "30d")]
    period: String,
    #[arg(long)]
    merge_buckets: bool,
}

#[derive(Args, Debug, Clone)]
struct TopPostsArgs {
    #[arg(long, default_value = "positive")]
    sentiment: String,
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[derive(Args, Debug, Clone)]
struct PostsArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    page_size: Option<u32>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let command = cli.command.unwrap_or(Command::Overview);

    if let Command::InitConfig = command {
        return run_init_config(config_path);
    }

    let (config, _) = DashboardConfig::load(config_path)?;
    let client = ApiClient::from_config(&config, ApiAuth::from_env())?;
    let json = cli.json;

    match command {
        Command::Overview => run_overview(&client, json).await,
        Command::Trends(args) => run_trends(&client, args, json).await,
        Command::TopPosts(args) => run_top_posts(&client, args, json).await,
        Command::Correlations => run_correlations(&client, json).await,
        Command::Comments => run_comments(&client, &config, json).await,
        Command::Posts(args) => run_posts(client, &config, args, json).await,
        Command::Stats => run_stats(&client, json).await,
        Command::Latest => run_latest(&client, json).await,
        Command::InitConfig => unreachable!("handled above"),
    }
}

fn run_init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path.unwrap_or_else(|| PathBuf::from("config/dashboard.toml"));
    DashboardConfig::default().write(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

async fn run_overview(client: &ApiClient, json: bool) -> Result<(), String> {
    let overview = client.sentiment_overview().await?;
    let distribution = normalize_distribution(&overview.sentiment_distribution);

    if json {
        return print_json(&json!({
            "totalPosts": overview.total_posts,
            "sentimentDistribution": distribution,
            "averageScores": {
                "positive": parse_metric(&overview.average_scores.avg_positive),
                "neutral": parse_metric(&overview.average_scores.avg_neutral),
                "negative": parse_metric(&overview.average_scores.avg_negative),
            },
        }));
    }

    println!("Posts analyzed: {}", format_number(overview.total_posts as f64));
    println!(
        "Sentiment split: positive {} | neutral {} | negative {}",
        format_percent(distribution.positive),
        format_percent(distribution.neutral),
        format_percent(distribution.negative)
    );
    println!(
        "Average scores: positive {} | neutral {} | negative {}",
        format_float(parse_metric(&overview.average_scores.avg_positive), 1),
        format_float(parse_metric(&overview.average_scores.avg_neutral), 1),
        format_float(parse_metric(&overview.average_scores.avg_negative), 1)
    );
    Ok(())
}

async fn run_trends(client: &ApiClient, args: TrendsArgs, json: bool) -> Result<(), String> {
    let period = Period::from_str(&args.period)
        .ok_or_else(|| format!("invalid period (7d|30d|90d): {}", args.period))?;
    let payload = client.sentiment_trends(period).await?;
    let rows = payload.current_period.daily_trends;
    let points = if args.merge_buckets {
        aggregate_daily_trends_merged(&rows)
    } else {
        aggregate_daily_trends(&rows)
    };

    if json {
        return print_json(&points);
    }
    if points.is_empty() {
        println!("No trend data for the selected period.");
        return Ok(());
    }
    for point in points {
        println!(
            "{}  positive {} | neutral {} | negative {} | score {}",
            point.date,
            format_percent(point.positive),
            format_percent(point.neutral),
            format_percent(point.negative),
            format_float(point.avg_score, 2)
        );
    }
    Ok(())
}

async fn run_top_posts(client: &ApiClient, args: TopPostsArgs, json: bool) -> Result<(), String> {
    let sentiment = SentimentCategory::from_str(&args.sentiment)
        .ok_or_else(|| format!("invalid sentiment: {}", args.sentiment))?;
    let posts = client.top_posts(sentiment, args.limit).await?;

    if json {
        return print_json(&posts);
    }
    if posts.is_empty() {
        println!("No {} posts found.", sentiment.label());
        return Ok(());
    }
    for (index, post) in posts.iter().enumerate() {
        println!(
            "#{} @{} ({}) score {}",
            index + 1,
            post.username,
            post.post_created_at,
            format_float(post.score, 2)
        );
        println!("   {}", post.message);
    }
    Ok(())
}

async fn run_correlations(client: &ApiClient, json: bool) -> Result<(), String> {
    let payload = client.sentiment_correlations().await?;
    let metrics = estimate_correlations(&payload.average_engagement_by_sentiment);

    if json {
        return print_json(&metrics);
    }
    for metric in metrics {
        println!(
            "{}: positive {} | negative {}",
            metric.metric,
            format_float(metric.positive_correlation, 2),
            format_float(metric.negative_correlation, 2)
        );
        println!("   {}", metric.description);
    }
    Ok(())
}

async fn run_comments(client: &ApiClient, config: &DashboardConfig, json: bool) -> Result<(), String> {
    let overview = client.comments_overview().await?;
    let distribution = normalize_distribution(&overview.comment_sentiment_distribution);

    let lookup = post_lookup(client).await;
    let ranked = merge_top_posts(
        &overview.top_positive_comments_posts,
        &overview.top_negative_comments_posts,
        &lookup,
        config.top_posts.limit,
    );

    if json {
        return print_json(&json!({
            "totalComments": overview.total_comments,
            "sentimentDistribution": distribution,
            "topPosts": ranked,
        }));
    }

    println!("Comments analyzed: {}", format_number(overview.total_comments as f64));
    println!(
        "Sentiment split: positive {} | neutral {} | negative {}",
        format_percent(distribution.positive),
        format_percent(distribution.neutral),
        format_percent(distribution.negative)
    );

    if ranked.is_empty() {
        println!("No posts with analyzed comments.");
        return Ok(());
    }
    println!("Most commented posts:");
    for (index, post) in ranked.iter().enumerate() {
        println!(
            "#{} @{}: {} comments ({} positive / {} negative)",
            index + 1,
            post.username,
            post.total_comment_count,
            post.positive_comment_count,
            post.negative_comment_count
        );
        println!("   {}", post.message);
    }
    Ok(())
}

// Enrichment source for the top-post merge; an unreachable post list just
// means every entry falls back to placeholders.
async fn post_lookup(client: &ApiClient) -> HashMap<String, PostDetails> {
    match client.latest_posts().await {
        Ok(posts) => posts
            .into_iter()
            .map(|post| (post.post_id.clone(), post.details()))
            .collect(),
        Err(_) => HashMap::new(),
    }
}

async fn run_posts(
    client: ApiClient,
    config: &DashboardConfig,
    args: PostsArgs,
    json: bool,
) -> Result<(), String> {
    let mut search_config = config.search.clone();
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            return Err("page size must be at least 1".to_string());
        }
        search_config.page_size = page_size;
    }

    let mut session = SearchSession::new(client, &search_config);
    let search = args.search.unwrap_or_default();

    let mut posts = session
        .input(&search)
        .await?
        .unwrap_or_default();
    for _ in 1..args.page {
        if session.controller().last_page_reached() {
            break;
        }
        posts = session.next_page().await?;
    }

    if json {
        return print_json(&posts);
    }
    if posts.is_empty() {
        println!("No results.");
        return Ok(());
    }
    println!(
        "Page {} ({}):",
        session.controller().page(),
        session.controller().phase().label()
    );
    for post in posts {
        println!(
            "@{} ({})  reactions {} | comments {} | shares {}",
            post.username,
            post.post_created_at,
            format_number(post.reaction_count as f64),
            format_number(post.comment_count as f64),
            format_number(post.share_count as f64)
        );
        if let Some(message) = post.message_text.as_deref() {
            if !message.is_empty() {
                println!("   {}", message);
            }
        }
    }
    Ok(())
}

async fn run_stats(client: &ApiClient, json: bool) -> Result<(), String> {
    let stats = client.stats().await?;

    if json {
        return print_json(&json!({
            "totalReactions": parse_metric(&stats.total_reactions),
            "totalComments": parse_metric(&stats.total_comments),
            "totalShares": parse_metric(&stats.total_shares),
            "totalVideoViews": parse_metric(&stats.total_video_views),
        }));
    }

    println!("Reactions: {}", format_number(parse_metric(&stats.total_reactions)));
    println!("Comments: {}", format_number(parse_metric(&stats.total_comments)));
    println!("Shares: {}", format_number(parse_metric(&stats.total_shares)));
    println!("Video views: {}", format_number(parse_metric(&stats.total_video_views)));
    Ok(())
}

async fn run_latest(client: &ApiClient, json: bool) -> Result<(), String> {
    let posts = client.latest_posts().await?;

    if json {
        return print_json(&posts);
    }
    if posts.is_empty() {
        println!("No recent posts.");
        return Ok(());
    }
    for post in posts {
        println!(
            "@{} ({})  reactions {} | comments {} | shares {}",
            post.username,
            post.post_created_at,
            format_number(post.reaction_count as f64),
            format_number(post.comment_count as f64),
            format_number(post.share_count as f64)
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
