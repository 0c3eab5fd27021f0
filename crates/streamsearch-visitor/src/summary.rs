use std::collections::HashMap;

use streamsearch_core::error::SearchError;
use streamsearch_core::types::RawHit;

/// Checks that every hit about to be presented has summary data.
///
/// A hit with no entry at all means the backend lost track of it. Entries that
/// exist but are empty were left unfilled when the visit ran out of time, so
/// they are reported together as a timeout.
pub fn reconcile_summaries(hits: &[RawHit], summaries: &HashMap<String, Vec<u8>>) -> Result<(), SearchError> {
    let mut unfilled = 0usize;
    for hit in hits {
        match summaries.get(&hit.id) {
            None => return Err(SearchError::MissingSummary(hit.id.clone())),
            Some(data) if data.is_empty() => unfilled += 1,
            Some(_) => {}
        }
    }
    if unfilled > 0 {
        return Err(SearchError::IncompleteSummaries(unfilled));
    }
    Ok(())
}
