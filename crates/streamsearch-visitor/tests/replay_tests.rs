use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use streamsearch_core::config::SearcherConfig;
use streamsearch_core::error::{ErrorCategory, VisitError};
use streamsearch_core::query::Query;
use streamsearch_core::route::Route;
use streamsearch_core::traits::{Visitor, VisitorFactory};
use streamsearch_core::types::{RawHit, VisitOutcome};
use streamsearch_visitor::{RecordedVisit, ReplayError, ReplayVisitorFactory, StreamingSearcher, VisitRecording};
use tempfile::TempDir;

const ONE_USER_HIT: &str = r#"{
    "query": "oneuserhit",
    "visit": { "outcome": {
        "hits": [{ "id": "id:namespace:mytype:n=1:userspecific0", "relevance": 1.0 }],
        "summaries": { "id:namespace:mytype:n=1:userspecific0": [85, 85, 85, 85] },
        "total_hit_count": 1
    } }
}"#;

const FAILURES: &str = r#"[
    { "query": "timeoutexception", "visit": { "failure": { "kind": "timed_out", "message": "Timed out" } } },
    { "query": "parseexception", "visit": { "failure": { "kind": "parse", "message": "Parsing failed" } } }
]"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write recording");
}

fn searcher(factory: ReplayVisitorFactory) -> StreamingSearcher {
    let route: Route = "default".parse().expect("route");
    StreamingSearcher::new(Arc::new(factory), SearcherConfig::new("clusterName", route, "mytype"))
}

#[test]
fn loads_single_and_array_files() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "one.json", ONE_USER_HIT);
    write(dir.path(), "failures.json", FAILURES);

    let single = ReplayVisitorFactory::load(&dir.path().join("one.json")).expect("load");
    assert_eq!(single.len(), 1);

    let many = ReplayVisitorFactory::load(&dir.path().join("failures.json")).expect("load");
    assert_eq!(many.len(), 2);
}

#[test]
fn loads_every_json_file_in_a_directory() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "one.json", ONE_USER_HIT);
    fs::create_dir(dir.path().join("nested")).expect("mkdir");
    write(&dir.path().join("nested"), "failures.json", FAILURES);
    write(dir.path(), "notes.txt", "not a recording");

    let factory = ReplayVisitorFactory::load(dir.path()).expect("load");
    assert_eq!(factory.len(), 3);
}

#[test]
fn rejects_duplicate_queries_across_files() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "a.json", ONE_USER_HIT);
    write(dir.path(), "b.json", ONE_USER_HIT);

    let err = ReplayVisitorFactory::load(dir.path()).expect_err("duplicate");
    assert!(matches!(err, ReplayError::Duplicate { ref query, .. } if query == "oneuserhit"));
}

#[test]
fn reports_unreadable_and_malformed_files() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "broken.json", "{ not json");

    let err = ReplayVisitorFactory::load(&dir.path().join("broken.json")).expect_err("bad json");
    assert!(matches!(err, ReplayError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));

    let err = ReplayVisitorFactory::load(&dir.path().join("missing.json")).expect_err("missing");
    assert!(matches!(err, ReplayError::Io { .. }));
}

#[tokio::test]
async fn replays_recorded_outcomes_through_the_searcher() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "one.json", ONE_USER_HIT);
    write(dir.path(), "failures.json", FAILURES);
    let searcher = searcher(ReplayVisitorFactory::load(dir.path()).expect("load"));

    let result = searcher
        .search(&Query::from_request("/?streaming.userid=1&query=oneuserhit").expect("query"))
        .await
        .expect("search");
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].source.as_deref(), Some("clusterName"));
    assert_eq!(result.hits[0].summary().expect("summary").data, vec![85, 85, 85, 85]);

    let err = searcher
        .search(&Query::from_request("/?streaming.userid=1&query=timeoutexception").expect("query"))
        .await
        .expect_err("timeout");
    assert_eq!(err.category(), ErrorCategory::TimedOut);

    let err = searcher
        .search(&Query::from_request("/?streaming.userid=1&query=parseexception").expect("query"))
        .await
        .expect_err("parse");
    assert!(err.detail().starts_with("Failed to parse document selection string"));
}

#[tokio::test]
async fn unknown_queries_visit_nothing() {
    let searcher = searcher(ReplayVisitorFactory::new());
    let result = searcher.search(&Query::new("anything").with_user_id(1)).await.expect("search");
    assert!(result.is_empty());
    assert_eq!(result.total_hit_count, 0);
}

#[tokio::test]
async fn delayed_recording_hits_the_query_timeout() {
    let mut factory = ReplayVisitorFactory::new();
    let mut outcome = VisitOutcome::default();
    outcome.push_hit_with_summary(RawHit::new("id:namespace:mytype:n=1:doc", 1.0), vec![1]);
    factory.insert(VisitRecording { query: "slow".into(), visit: RecordedVisit::Outcome(outcome), delay_ms: 5_000 });
    let searcher = searcher(factory);

    let query = Query::new("slow").with_user_id(1).with_timeout(Duration::from_millis(20));
    let err = searcher.search(&query).await.expect_err("timeout");
    assert_eq!(err.category(), ErrorCategory::TimedOut);
    assert!(err.detail().contains("20 ms"));
}

#[tokio::test]
async fn replay_visitor_returns_the_recorded_failure() {
    let mut factory = ReplayVisitorFactory::new();
    factory.insert(VisitRecording {
        query: "interrupted".into(),
        visit: RecordedVisit::Failure(VisitError::Interrupted("Interrupted".into())),
        delay_ms: 0,
    });
    let route: Route = "default".parse().expect("route");
    let visitor = factory.create_visitor(&Query::new("interrupted"), "clusterName", &route, "mytype");
    assert_eq!(visitor.do_search().await, Err(VisitError::Interrupted("Interrupted".into())));
}

#[tokio::test]
async fn shipped_recordings_load_and_replay() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../recordings");
    let factory = ReplayVisitorFactory::load(&dir).expect("load shipped recordings");
    assert_eq!(factory.len(), 10);
    let searcher = searcher(factory);

    let result = searcher
        .search(&Query::from_request("/?streaming.groupname=group1&query=twogrouphitsandoneuserhit").expect("query"))
        .await
        .expect("search");
    assert_eq!(result.hits.len(), 2);
    assert_eq!(result.total_hit_count, 3);

    let err = searcher
        .search(&Query::from_request("/?streaming.userid=1&query=nosummarytofill").expect("query"))
        .await
        .expect_err("unfilled summary");
    assert_eq!(err.detail(), "Missing hit summary data for 1 hits");
}
