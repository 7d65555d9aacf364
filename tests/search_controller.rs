use std::time::Duration;

use pulse_analytics::config::SearchConfig;
use pulse_analytics::search::{FetchPlan, SearchController, SearchPhase};
use pulse_analytics::Post;

fn config(page_size: u32, freshness_secs: u64) -> SearchConfig {
    SearchConfig {
        page_size,
        debounce_ms: 400,
        cache_freshness_secs: freshness_secs,
        order_by: "postCreatedAt:desc".to_string(),
    }
}

fn post(post_id: &str) -> Post {
    Post {
        post_id: post_id.to_string(),
        user_id: "user".to_string(),
        username: "alice".to_string(),
        created_at: "2024-01-15T10:30:00Z".to_string(),
        post_created_at: "2024-01-15T09:00:00Z".to_string(),
        media_type: None,
        message_text: Some("hello".to_string()),
        comment_count: 1,
        share_count: 0,
        reaction_count: 2,
        video_view_count: 0,
        permalink: None,
    }
}

fn fetch_ticket(controller: &mut SearchController) -> pulse_analytics::search::FetchTicket {
    match controller.begin_fetch() {
        FetchPlan::Fetch(ticket) => ticket,
        FetchPlan::Cached(_) => panic!("expected a fetch, got a cached page"),
    }
}

#[test]
fn rapid_input_commits_only_the_last_value() {
    let mut controller = SearchController::new(&config(20, 30));

    let first = controller.on_input_change("abc");
    let second = controller.on_input_change("abcd");

    assert_eq!(controller.raw_input(), "abcd");
    assert!(!controller.commit(first));
    assert_eq!(controller.committed_search(), "");
    assert!(controller.commit(second));
    assert_eq!(controller.committed_search(), "abcd");
    assert_eq!(controller.page(), 1);
}

#[test]
fn new_search_term_resets_page_to_1() {
    let mut controller = SearchController::new(&config(20, 30));

    let pending = controller.on_input_change("madagascar");
    assert!(controller.commit(pending));
    controller.on_page_change(1);
    controller.on_page_change(1);
    assert_eq!(controller.page(), 3);

    let pending = controller.on_input_change("antananarivo");
    assert!(controller.commit(pending));
    assert_eq!(controller.page(), 1);
}

#[test]
fn recommitting_same_term_keeps_page() {
    let mut controller = SearchController::new(&config(20, 30));

    let pending = controller.on_input_change("madagascar");
    assert!(controller.commit(pending));
    controller.on_page_change(1);
    assert_eq!(controller.page(), 2);

    let pending = controller.on_input_change("madagascar");
    assert!(controller.commit(pending));
    assert_eq!(controller.page(), 2);
}

#[test]
fn page_navigation_never_touches_committed_search() {
    let mut controller = SearchController::new(&config(20, 30));

    let pending = controller.on_input_change("abc");
    assert!(controller.commit(pending));
    controller.on_page_change(1);

    assert_eq!(controller.committed_search(), "abc");
    assert_eq!(controller.page(), 2);
}

#[test]
fn page_clamps_to_minimum_of_1() {
    let mut controller = SearchController::new(&config(20, 30));

    controller.on_page_change(-1);
    assert_eq!(controller.page(), 1);
    controller.on_page_change(-5);
    assert_eq!(controller.page(), 1);
}

#[test]
fn fetch_result_transitions_phase() {
    let mut controller = SearchController::new(&config(20, 30));

    let ticket = fetch_ticket(&mut controller);
    assert_eq!(*controller.phase(), SearchPhase::Fetching);

    assert!(controller.apply_result(&ticket, Ok(vec![post("p1")])));
    assert_eq!(*controller.phase(), SearchPhase::Loaded);
    assert_eq!(controller.phase().label(), "loaded");
    assert_eq!(controller.current_page().map(|posts| posts.len()), Some(1));
}

#[test]
fn empty_result_is_distinct_from_loading() {
    let mut controller = SearchController::new(&config(20, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![])));
    assert_eq!(*controller.phase(), SearchPhase::NoResults);
    assert_eq!(controller.phase().label(), "no-results");
}

#[test]
fn failed_fetch_surfaces_error_phase() {
    let mut controller = SearchController::new(&config(20, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Err("api error: 500".to_string())));
    assert_eq!(*controller.phase(), SearchPhase::Errored("api error: 500".to_string()));
}

#[test]
fn stale_response_is_dropped_after_key_change() {
    let mut controller = SearchController::new(&config(20, 30));

    let pending = controller.on_input_change("old");
    assert!(controller.commit(pending));
    let stale_ticket = fetch_ticket(&mut controller);

    // The search moves on while the first request is still in flight.
    let pending = controller.on_input_change("new");
    assert!(controller.commit(pending));

    assert!(!controller.apply_result(&stale_ticket, Ok(vec![post("stale")])));
    assert_eq!(*controller.phase(), SearchPhase::Committed);
    assert!(controller.current_page().is_none());
}

#[test]
fn identical_key_is_served_from_cache() {
    let mut controller = SearchController::new(&config(20, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("p1")])));

    match controller.begin_fetch() {
        FetchPlan::Cached(posts) => assert_eq!(posts.len(), 1),
        FetchPlan::Fetch(_) => panic!("fresh key must not refetch"),
    }
    assert_eq!(*controller.phase(), SearchPhase::Loaded);
}

#[test]
fn expired_cache_entry_triggers_a_refetch() {
    let mut controller = SearchController::new(&config(20, 0));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("p1")])));

    match controller.begin_fetch() {
        FetchPlan::Fetch(_) => {}
        FetchPlan::Cached(_) => panic!("zero freshness must refetch"),
    }
}

#[test]
fn different_pages_are_cached_independently() {
    let mut controller = SearchController::new(&config(20, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("page1")])));

    controller.on_page_change(1);
    match controller.begin_fetch() {
        FetchPlan::Fetch(ticket) => {
            assert_eq!(ticket.query().page, 2);
            assert!(controller.apply_result(&ticket, Ok(vec![post("page2")])));
        }
        FetchPlan::Cached(_) => panic!("page 2 was never fetched"),
    }

    controller.on_page_change(-1);
    match controller.begin_fetch() {
        FetchPlan::Cached(posts) => assert_eq!(posts[0].post_id, "page1"),
        FetchPlan::Fetch(_) => panic!("page 1 is still fresh"),
    }
}

#[test]
fn short_page_signals_end_of_results() {
    let mut controller = SearchController::new(&config(2, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("only")])));
    assert!(controller.last_page_reached());
}

#[test]
fn full_page_does_not_signal_end_of_results() {
    let mut controller = SearchController::new(&config(2, 30));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("a"), post("b")])));
    assert!(!controller.last_page_reached());
}

#[test]
fn expired_entries_are_evicted_on_new_results() {
    let mut controller = SearchController::new(&config(20, 0));

    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("page1")])));

    controller.on_page_change(1);
    let ticket = fetch_ticket(&mut controller);
    assert!(controller.apply_result(&ticket, Ok(vec![post("page2")])));

    // The page-1 entry expired immediately and must be gone, not merely
    // bypassed by the freshness check.
    controller.on_page_change(-1);
    assert!(controller.current_page().is_none());
}

#[test]
fn page_size_override_flows_into_query() {
    let mut search_config = config(20, 30);
    search_config.page_size = 7;
    let mut controller = SearchController::new(&search_config);

    assert_eq!(controller.current_query().page_size, 7);

    let ticket = fetch_ticket(&mut controller);
    let full_page: Vec<Post> = (0..7).map(|index| post(&format!("p{}", index))).collect();
    assert!(controller.apply_result(&ticket, Ok(full_page)));
    assert!(!controller.last_page_reached());
}

#[test]
fn current_query_carries_controller_state() {
    let mut controller = SearchController::new(&config(20, 30));

    let pending = controller.on_input_change("abc");
    assert!(controller.commit(pending));
    controller.on_page_change(1);

    let query = controller.current_query();
    assert_eq!(query.page, 2);
    assert_eq!(query.page_size, 20);
    assert_eq!(query.order_by, "postCreatedAt:desc");
    assert_eq!(query.search, "abc");
}

#[tokio::test(start_paused = true)]
async fn late_debounce_timer_cannot_commit_superseded_input() {
    let mut controller = SearchController::new(&config(20, 30));

    let first = controller.on_input_change("abc");
    assert_eq!(first.delay, Duration::from_millis(400));
    tokio::time::sleep(Duration::from_millis(200)).await;

    // A second keystroke lands before the first quiet interval elapses.
    let second = controller.on_input_change("abcd");
    tokio::time::sleep(first.delay).await;

    assert!(!controller.commit(first));
    assert_eq!(*controller.phase(), SearchPhase::Debouncing);
    tokio::time::sleep(second.delay).await;
    assert!(controller.commit(second));
    assert_eq!(controller.committed_search(), "abcd");
}
