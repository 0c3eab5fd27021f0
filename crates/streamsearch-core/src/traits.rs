use async_trait::async_trait;

use crate::error::VisitError;
use crate::query::Query;
use crate::route::Route;
use crate::types::VisitOutcome;

/// One remote visit against a content cluster. Consumed by the search it runs.
#[async_trait]
pub trait Visitor: Send {
    async fn do_search(self: Box<Self>) -> Result<VisitOutcome, VisitError>;
}

/// Builds visitors for the streaming searcher. Must not perform I/O when
/// called; the connection work belongs in [`Visitor::do_search`].
pub trait VisitorFactory: Send + Sync {
    fn create_visitor(&self, query: &Query, cluster_name: &str, route: &Route, document_type: &str) -> Box<dyn Visitor>;
}
