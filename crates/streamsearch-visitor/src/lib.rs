//! streamsearch-visitor
//!
//! The streaming visitor searcher: runs one visit per query through a
//! [`VisitorFactory`](streamsearch_core::traits::VisitorFactory), validates what
//! comes back and assembles the result. `replay` provides a factory backed by
//! recorded visits.

#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod assembler;
pub mod replay;
pub mod searcher;
pub mod summary;

pub use assembler::ResultAssembler;
pub use replay::{RecordedVisit, ReplayError, ReplayVisitorFactory, VisitRecording};
pub use searcher::StreamingSearcher;
