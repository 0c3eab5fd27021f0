use std::collections::HashMap;

use streamsearch_core::types::{
    Coverage, Grouping, Hit, HitPayload, RawHit, SearchResult, Summary, VisitorStatistics, GROUPING_HIT_ID,
};

/// Turns validated hits into the caller-facing result. Regular hits are
/// labelled with the cluster they came from; one meta-hit is appended per
/// grouping, without a source.
pub struct ResultAssembler<'a> {
    source: &'a str,
    summary_class: Option<&'a str>,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(source: &'a str, summary_class: Option<&'a str>) -> Self {
        Self { source, summary_class }
    }

    pub fn assemble(
        &self,
        hits: Vec<RawHit>,
        summaries: &HashMap<String, Vec<u8>>,
        groupings: Vec<Grouping>,
        total_hit_count: u64,
        statistics: &VisitorStatistics,
        trace: Vec<String>,
    ) -> SearchResult {
        let mut presented: Vec<Hit> = hits.into_iter().map(|hit| self.document_hit(hit, summaries)).collect();
        presented.extend(groupings.iter().cloned().map(grouping_hit));
        SearchResult {
            hits: presented,
            groupings,
            total_hit_count,
            coverage: Coverage::from(statistics),
            trace,
        }
    }

    fn document_hit(&self, hit: RawHit, summaries: &HashMap<String, Vec<u8>>) -> Hit {
        let summary = self.summary_class.and_then(|class| {
            summaries.get(&hit.id).map(|data| Summary { class: class.to_string(), data: data.clone() })
        });
        Hit {
            id: hit.id,
            relevance: hit.relevance,
            source: Some(self.source.to_string()),
            payload: HitPayload::Document { summary },
        }
    }
}

fn grouping_hit(grouping: Grouping) -> Hit {
    Hit {
        id: GROUPING_HIT_ID.to_string(),
        relevance: 1.0,
        source: None,
        payload: HitPayload::Grouping { grouping },
    }
}
