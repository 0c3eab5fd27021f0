//! streamsearch-core
//!
//! Types shared by the streaming searcher and its visitors: document
//! identifiers, queries, partition predicates, results and the error taxonomy.

#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod docid;
pub mod error;
pub mod query;
pub mod route;
pub mod selection;
pub mod traits;
pub mod types;

pub use docid::{DocumentId, DocumentIdError, Partition};
pub use error::{ErrorCategory, ErrorMessage, SearchError, VisitError};
pub use query::{Query, SortSpec};
pub use route::Route;
pub use selection::{admissible, PartitionPredicate};
pub use traits::{Visitor, VisitorFactory};
