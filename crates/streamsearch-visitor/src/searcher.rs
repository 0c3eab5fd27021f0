//! The streaming visitor searcher.
//!
//! One `StreamingSearcher` is shared by every in-flight query. A search derives
//! the partition predicate, runs a single visit bounded by the query timeout,
//! drops hits from outside the requested partition, checks the returned
//! summaries and hands the rest to the [`ResultAssembler`].

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, warn};

use streamsearch_core::config::SearcherConfig;
use streamsearch_core::error::SearchError;
use streamsearch_core::query::Query;
use streamsearch_core::selection::{admissible, document_selection, PartitionPredicate};
use streamsearch_core::traits::VisitorFactory;
use streamsearch_core::types::{RawHit, SearchResult, VisitOutcome};

use crate::assembler::ResultAssembler;
use crate::summary::reconcile_summaries;

pub struct StreamingSearcher {
    factory: Arc<dyn VisitorFactory>,
    config: SearcherConfig,
}

impl StreamingSearcher {
    pub fn new(factory: Arc<dyn VisitorFactory>, config: SearcherConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &SearcherConfig { &self.config }

    pub async fn search(&self, query: &Query) -> Result<SearchResult, SearchError> {
        let predicate = PartitionPredicate::from_query(query).map_err(|err| {
            warn!(query = %query.query_string, "{err}");
            err
        })?;

        let mut trace = Vec::new();
        if query.trace_level >= 1 {
            let selection = document_selection(query, &self.config.document_type).unwrap_or_default();
            trace.push(format!("Streaming search selection: {selection}"));
            trace.push(format!("Streaming search route: {}", self.config.route));
        }

        let VisitOutcome { hits, summaries, groupings, statistics, total_hit_count } = self.visit(query).await?;
        debug!(
            cluster = %self.config.cluster_name,
            hits = hits.len(),
            summaries = summaries.len(),
            groupings = groupings.len(),
            total_hit_count,
            "Streaming visit completed"
        );

        let (hits, rejected) = select_hits(query, &predicate, hits);
        if query.trace_level >= 2 {
            trace.push(format!(
                "Visitor statistics: buckets visited {}, documents visited {}, documents returned {}, hits returned {}",
                statistics.buckets_visited, statistics.documents_visited, statistics.documents_returned, statistics.hits_returned
            ));
            trace.push(format!("Rejected {rejected} hits outside the requested partition"));
        }

        let summary_class = query.summary_class.as_deref().or(self.config.default_summary_class.as_deref());
        if summary_class.is_some() {
            reconcile_summaries(&hits, &summaries).map_err(|err| {
                warn!(query = %query.query_string, detail = %err, "Incomplete summaries from streaming visit");
                err
            })?;
        }

        let result = ResultAssembler::new(&self.config.cluster_name, summary_class).assemble(
            hits,
            &summaries,
            groupings,
            total_hit_count,
            &statistics,
            trace,
        );
        info!(query = %query.query_string, hits = result.len(), total_hit_count, "Streaming search done");
        Ok(result)
    }

    /// Runs the visit. Dropping the returned future (or hitting the query
    /// timeout) drops the visitor's in-flight search.
    async fn visit(&self, query: &Query) -> Result<VisitOutcome, SearchError> {
        let visitor = self.factory.create_visitor(
            query,
            &self.config.cluster_name,
            &self.config.route,
            &self.config.document_type,
        );
        match tokio::time::timeout(query.timeout, visitor.do_search()).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => {
                let err = SearchError::from(err);
                warn!(category = ?err.category(), detail = %err, "Streaming visit failed");
                Err(err)
            }
            Err(_) => {
                let timeout_ms = u64::try_from(query.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms, "Streaming visit exceeded the query timeout");
                Err(SearchError::TimedOut(format!("Timed out after {timeout_ms} ms waiting for the streaming visit")))
            }
        }
    }
}

/// Drops inadmissible hits, orders by sort blob when the query sorts, and
/// applies the `[offset, offset + hits)` window. Returns the kept hits and
/// the number rejected.
fn select_hits(query: &Query, predicate: &PartitionPredicate, hits: Vec<RawHit>) -> (Vec<RawHit>, usize) {
    let mut rejected = 0usize;
    let mut admitted: Vec<RawHit> = hits
        .into_iter()
        .filter(|hit| {
            if admissible(&hit.id, predicate, false) {
                return true;
            }
            if rejected == 0 {
                warn!(id = %hit.id, ?predicate, "Dropping hit outside the requested partition");
            } else {
                debug!(id = %hit.id, ?predicate, "Dropping hit outside the requested partition");
            }
            rejected += 1;
            false
        })
        .collect();

    if query.sort.is_some() {
        admitted.sort_by(compare_sort_blobs);
    }
    let windowed = admitted.into_iter().skip(query.offset).take(query.hits).collect();
    (windowed, rejected)
}

/// Hits without a sort blob go after those with one.
fn compare_sort_blobs(a: &RawHit, b: &RawHit) -> Ordering {
    match (&a.sort_blob, &b.sort_blob) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
