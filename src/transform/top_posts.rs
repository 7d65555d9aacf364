use std::collections::HashMap;

use crate::{PostDetails, TopNegativeRow, TopPositiveRow, TopPostRanked};

// Misses degrade to placeholders, never errors.
pub trait PostLookup {
    fn resolve(&self, post_id: &str) -> Option<PostDetails>;
}

impl PostLookup for HashMap<String, PostDetails> {
    fn resolve(&self, post_id: &str) -> Option<PostDetails> {
        self.get(post_id).cloned()
    }
}

// A post present in only one list gets 0 for the missing count; rows with
// an empty post id are skipped. The final order is total comment count
// descending, insertion order preserved on ties.
pub fn merge_top_posts(
    top_positive: &[TopPositiveRow],
    top_negative: &[TopNegativeRow],
    lookup: &dyn PostLookup,
    limit: usize,
) -> Vec<TopPostRanked> {
    let mut merged: Vec<TopPostRanked> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for row in top_positive {
        if row.post_id.is_empty() {
            continue;
        }
        index_by_id.insert(row.post_id.clone(), merged.len());
        merged.push(TopPostRanked {
            post_id: row.post_id.clone(),
            positive_comment_count: row.positive_comments_count,
            negative_comment_count: 0,
            total_comment_count: 0,
            message: String::new(),
            username: String::new(),
            post_created_at: String::new(),
        });
    }

    for row in top_negative {
        if row.post_id.is_empty() {
            continue;
        }
        match index_by_id.get(&row.post_id) {
            Some(&index) => {
                merged[index].negative_comment_count = row.negative_comments_count;
            }
            None => {
                index_by_id.insert(row.post_id.clone(), merged.len());
                merged.push(TopPostRanked {
                    post_id: row.post_id.clone(),
                    positive_comment_count: 0,
                    negative_comment_count: row.negative_comments_count,
                    total_comment_count: 0,
                    message: String::new(),
                    username: String::new(),
                    post_created_at: String::new(),
                });
            }
        }
    }

    for entry in merged.iter_mut() {
        entry.total_comment_count = entry.positive_comment_count + entry.negative_comment_count;
        let details = lookup
            .resolve(&entry.post_id)
            .unwrap_or_else(|| placeholder_details(&entry.post_id));
        entry.message = details.message;
        entry.username = details.username;
        entry.post_created_at = details.created_at;
    }

    // Vec::sort_by is stable, so equal totals keep their insertion order.
    merged.sort_by(|a, b| b.total_comment_count.cmp(&a.total_comment_count));
    merged.truncate(limit);
    merged
}

fn placeholder_details(post_id: &str) -> PostDetails {
    let truncated: String = post_id.chars().take(12).collect();
    PostDetails {
        message: format!("Content of post {}", truncated),
        username: "unknown".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}
