//! Visitors that replay recorded visits.
//!
//! A recording file holds one recording or a JSON array of them:
//!
//! ```json
//! { "query": "oneuserhit",
//!   "visit": { "outcome": { "hits": [{ "id": "id:ns:mytype:n=1:doc0", "relevance": 1.0 }],
//!                           "summaries": { "id:ns:mytype:n=1:doc0": [85, 85] },
//!                           "total_hit_count": 1 } } }
//! ```
//!
//! Failures are recorded as `"visit": { "failure": { "kind": "timed_out", "message": "..." } }`.
//! Recordings are keyed by query string; unknown queries visit nothing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use streamsearch_core::error::VisitError;
use streamsearch_core::query::Query;
use streamsearch_core::route::Route;
use streamsearch_core::traits::{Visitor, VisitorFactory};
use streamsearch_core::types::VisitOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordedVisit {
    Outcome(VisitOutcome),
    Failure(VisitError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecording {
    pub query: String,
    pub visit: RecordedVisit,
    /// Simulated backend latency.
    #[serde(default)]
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordingFile {
    Many(Vec<VisitRecording>),
    One(VisitRecording),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse recording {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate recording for query '{query}' in {path}")]
    Duplicate { query: String, path: PathBuf },
}

#[derive(Debug, Default, Clone)]
pub struct ReplayVisitorFactory {
    recordings: HashMap<String, VisitRecording>,
}

impl ReplayVisitorFactory {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.recordings.len() }
    pub fn is_empty(&self) -> bool { self.recordings.is_empty() }

    /// Adds a recording, replacing any earlier one for the same query.
    pub fn insert(&mut self, recording: VisitRecording) {
        self.recordings.insert(recording.query.clone(), recording);
    }

    /// Loads a single file, or every `*.json` file below a directory in path order.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let mut factory = Self::new();
        if path.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
                .map(|e| e.path().to_path_buf())
                .collect();
            files.sort();
            for file in &files {
                factory.load_file(file)?;
            }
        } else {
            factory.load_file(path)?;
        }
        info!(path = %path.display(), recordings = factory.len(), "Loaded visit recordings");
        Ok(factory)
    }

    fn load_file(&mut self, path: &Path) -> Result<(), ReplayError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
        let parsed: RecordingFile = serde_json::from_str(&content)
            .map_err(|source| ReplayError::Json { path: path.to_path_buf(), source })?;
        let recordings = match parsed {
            RecordingFile::Many(recordings) => recordings,
            RecordingFile::One(recording) => vec![recording],
        };
        for recording in recordings {
            if self.recordings.contains_key(&recording.query) {
                return Err(ReplayError::Duplicate { query: recording.query, path: path.to_path_buf() });
            }
            debug!(query = %recording.query, path = %path.display(), "Registered visit recording");
            self.insert(recording);
        }
        Ok(())
    }
}

impl VisitorFactory for ReplayVisitorFactory {
    fn create_visitor(&self, query: &Query, cluster_name: &str, route: &Route, document_type: &str) -> Box<dyn Visitor> {
        Box::new(ReplayVisitor {
            query: query.query_string.clone(),
            target: format!("{cluster_name}/{document_type} via {route}"),
            recording: self.recordings.get(&query.query_string).cloned(),
        })
    }
}

struct ReplayVisitor {
    query: String,
    target: String,
    recording: Option<VisitRecording>,
}

#[async_trait]
impl Visitor for ReplayVisitor {
    async fn do_search(self: Box<Self>) -> Result<VisitOutcome, VisitError> {
        let ReplayVisitor { query, target, recording } = *self;
        let Some(recording) = recording else {
            debug!(%query, %target, "No recording for query; replaying an empty visit");
            return Ok(VisitOutcome::default());
        };
        if recording.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(recording.delay_ms)).await;
        }
        debug!(%query, %target, "Replaying recorded visit");
        match recording.visit {
            RecordedVisit::Outcome(outcome) => Ok(outcome),
            RecordedVisit::Failure(err) => Err(err),
        }
    }
}
