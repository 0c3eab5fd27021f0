//! Domain types exchanged between visitors, the searcher and its callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier given to hits that carry a grouping result instead of a document.
pub const GROUPING_HIT_ID: &str = "meta:grouping";

/// A hit as returned by the content cluster, before validation.
///
/// `id` is untrusted and unparsed. `sort_blob` is the byte-comparable sort key
/// the backend computed for the query's sort specification, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub id: String,
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_blob: Option<Vec<u8>>,
}

impl RawHit {
    pub fn new(id: impl Into<String>, relevance: f64) -> Self {
        Self { id: id.into(), relevance, sort_blob: None }
    }

    pub fn with_sort_blob(mut self, blob: impl Into<Vec<u8>>) -> Self {
        self.sort_blob = Some(blob.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitorStatistics {
    pub buckets_visited: u64,
    pub documents_visited: u64,
    pub documents_returned: u64,
    pub hits_returned: u64,
}

/// An aggregation result. The grouping payload is opaque to this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub id: u32,
    #[serde(default)]
    pub data: Vec<u8>,
}

/// Everything a single visit produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitOutcome {
    pub hits: Vec<RawHit>,
    pub summaries: HashMap<String, Vec<u8>>,
    pub groupings: Vec<Grouping>,
    pub statistics: VisitorStatistics,
    /// As reported by the backend; may exceed `hits.len()`.
    pub total_hit_count: u64,
}

impl VisitOutcome {
    pub fn statistics(&self) -> &VisitorStatistics { &self.statistics }
    pub fn hits(&self) -> &[RawHit] { &self.hits }
    pub fn summaries(&self) -> &HashMap<String, Vec<u8>> { &self.summaries }
    pub fn groupings(&self) -> &[Grouping] { &self.groupings }
    pub fn total_hit_count(&self) -> u64 { self.total_hit_count }

    /// Adds a hit together with its summary and counts it in the total.
    pub fn push_hit_with_summary(&mut self, hit: RawHit, summary: impl Into<Vec<u8>>) {
        self.summaries.insert(hit.id.clone(), summary.into());
        self.push_hit(hit);
    }

    pub fn push_hit(&mut self, hit: RawHit) {
        self.hits.push(hit);
        self.total_hit_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub class: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitPayload {
    Document { summary: Option<Summary> },
    Grouping { grouping: Grouping },
}

/// A hit as presented to the caller.
///
/// `source` is the cluster the document came from; grouping meta-hits have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub relevance: f64,
    pub source: Option<String>,
    pub payload: HitPayload,
}

impl Hit {
    pub fn is_meta(&self) -> bool {
        matches!(self.payload, HitPayload::Grouping { .. })
    }

    pub fn summary(&self) -> Option<&Summary> {
        match &self.payload {
            HitPayload::Document { summary } => summary.as_ref(),
            HitPayload::Grouping { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub documents_visited: u64,
    pub buckets_visited: u64,
    pub documents_returned: u64,
}

impl From<&VisitorStatistics> for Coverage {
    fn from(stats: &VisitorStatistics) -> Self {
        Self {
            documents_visited: stats.documents_visited,
            buckets_visited: stats.buckets_visited,
            documents_returned: stats.documents_returned,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<Hit>,
    pub groupings: Vec<Grouping>,
    pub total_hit_count: u64,
    pub coverage: Coverage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

impl SearchResult {
    pub fn len(&self) -> usize { self.hits.len() }
    pub fn is_empty(&self) -> bool { self.hits.is_empty() }
}
