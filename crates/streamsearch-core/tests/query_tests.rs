use std::time::Duration;

use streamsearch_core::query::{Query, QueryError, SortOrder, SortSpec, DEFAULT_HITS, DEFAULT_TIMEOUT};
use streamsearch_core::route::{Route, RouteError};

#[test]
fn parses_streaming_request_parameters() {
    let query = Query::from_request("/?streaming.userid=1&query=oneuserhit&sorting=%2Bsurname&tracelevel=3")
        .expect("query");
    assert_eq!(query.query_string, "oneuserhit");
    assert_eq!(query.user_id, Some(1));
    assert_eq!(query.group_name, None);
    assert_eq!(query.trace_level, 3);
    let sort = query.sort.expect("sort");
    assert_eq!(sort.fields.len(), 1);
    assert_eq!(sort.fields[0].field, "surname");
    assert_eq!(sort.fields[0].order, SortOrder::Ascending);
}

#[test]
fn percent_decodes_selection() {
    let query = Query::from_request("/?streaming.selection=id.user%3D%3d1&query=twouserhits").expect("query");
    assert_eq!(query.selection.as_deref(), Some("id.user==1"));
    assert_eq!(query.user_id, None);
}

#[test]
fn form_decodes_plus_as_space() {
    let query = Query::from_request("query=x&streaming.groupname=a+b").expect("query");
    assert_eq!(query.group_name.as_deref(), Some("a b"));

    let query = Query::from_request("query=x&streaming.groupname=a%2Bb").expect("query");
    assert_eq!(query.group_name.as_deref(), Some("a+b"));
}

#[test]
fn applies_defaults() {
    let query = Query::from_request("query=x&streaming.groupname=group1").expect("query");
    assert_eq!(query.group_name.as_deref(), Some("group1"));
    assert_eq!(query.timeout, DEFAULT_TIMEOUT);
    assert_eq!(query.hits, DEFAULT_HITS);
    assert_eq!(query.offset, 0);
    assert_eq!(query.summary_class, None);

    let query = Query::from_request_with_timeout("query=x", Duration::from_millis(250)).expect("query");
    assert_eq!(query.timeout, Duration::from_millis(250));
}

#[test]
fn parses_summary_window_and_timeouts() {
    let query = Query::from_request("/?query=x&summary=short&hits=5&offset=2&timeout=500ms").expect("query");
    assert_eq!(query.summary_class.as_deref(), Some("short"));
    assert_eq!((query.offset, query.hits), (2, 5));
    assert_eq!(query.timeout, Duration::from_millis(500));

    assert_eq!(Query::from_request("timeout=2s").expect("q").timeout, Duration::from_secs(2));
    assert_eq!(Query::from_request("timeout=1.5").expect("q").timeout, Duration::from_millis(1500));
    assert_eq!(
        Query::from_request("presentation.summary=full").expect("q").summary_class.as_deref(),
        Some("full")
    );
}

#[test]
fn rejects_malformed_values() {
    assert!(matches!(
        Query::from_request("streaming.userid=abc"),
        Err(QueryError::InvalidParameter { ref key, .. }) if key == "streaming.userid"
    ));
    assert!(matches!(Query::from_request("timeout=soon"), Err(QueryError::InvalidParameter { .. })));
    assert!(matches!(Query::from_request("query=x&streaming.userid=1&timeout=1e20"), Err(QueryError::InvalidParameter { .. })));
    assert!(matches!(Query::from_request("timeout=-2"), Err(QueryError::InvalidParameter { .. })));
    assert!(matches!(Query::from_request("timeout=NaN"), Err(QueryError::InvalidParameter { .. })));
    assert!(matches!(Query::from_request("hits=-1"), Err(QueryError::InvalidParameter { .. })));
    assert!(matches!(Query::from_request("sorting=%2B"), Err(QueryError::EmptySortField(_))));
}

#[test]
fn ignores_unknown_parameters() {
    let query = Query::from_request("/search/?query=x&ranking=bm25&streaming.userid=9").expect("query");
    assert_eq!(query.user_id, Some(9));
}

#[test]
fn sort_spec_round_trips() {
    let spec = SortSpec::parse("+surname -age year").expect("sort");
    assert_eq!(spec.fields[1].order, SortOrder::Descending);
    assert_eq!(spec.fields[2].order, SortOrder::Ascending);
    assert_eq!(spec.to_string(), "+surname -age +year");
    assert!(SortSpec::parse("   ").is_err());
}

#[test]
fn route_parses_hops() {
    let route: Route = "[Storage:cluster=music] default".parse().expect("route");
    assert_eq!(route.hops().len(), 2);
    assert_eq!(route.to_string(), "[Storage:cluster=music] default");
    assert_eq!("  ".parse::<Route>(), Err(RouteError::Empty));
}
