//! The search request as seen by the streaming searcher.
//!
//! Queries are usually built from request parameters in URL form, e.g.
//! `/?streaming.userid=1&query=foo&sorting=%2Bsurname`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid value '{value}' for parameter '{key}': {reason}")]
    InvalidParameter { key: String, value: String, reason: String },

    #[error("Empty sort field in sort specification '{0}'")]
    EmptySortField(String),
}

impl QueryError {
    fn invalid(key: &str, value: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidParameter { key: key.to_string(), value: value.to_string(), reason: reason.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

/// Ordered list of sort fields, written as `+surname -age` on the wire.
/// A field without a sign sorts ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub fields: Vec<SortField>,
}

impl SortSpec {
    pub fn parse(spec: &str) -> Result<Self, QueryError> {
        let mut fields = Vec::new();
        for token in spec.split_whitespace() {
            let (order, field) = match token.as_bytes()[0] {
                b'+' => (SortOrder::Ascending, &token[1..]),
                b'-' => (SortOrder::Descending, &token[1..]),
                _ => (SortOrder::Ascending, token),
            };
            if field.is_empty() {
                return Err(QueryError::EmptySortField(spec.to_string()));
            }
            fields.push(SortField { field: field.to_string(), order });
        }
        if fields.is_empty() {
            return Err(QueryError::EmptySortField(spec.to_string()));
        }
        Ok(Self { fields })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let sign = match field.order {
                SortOrder::Ascending => '+',
                SortOrder::Descending => '-',
            };
            write!(f, "{sign}{}", field.field)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub query_string: String,
    pub selection: Option<String>,
    pub user_id: Option<u64>,
    pub group_name: Option<String>,
    pub summary_class: Option<String>,
    pub sort: Option<SortSpec>,
    pub trace_level: u32,
    pub timeout: Duration,
    pub offset: usize,
    pub hits: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            query_string: String::new(),
            selection: None,
            user_id: None,
            group_name: None,
            summary_class: None,
            sort: None,
            trace_level: 0,
            timeout: DEFAULT_TIMEOUT,
            offset: 0,
            hits: DEFAULT_HITS,
        }
    }
}

impl Query {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self { query_string: query_string.into(), ..Self::default() }
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self { self.selection = Some(selection.into()); self }
    pub fn with_user_id(mut self, user_id: u64) -> Self { self.user_id = Some(user_id); self }
    pub fn with_group_name(mut self, group: impl Into<String>) -> Self { self.group_name = Some(group.into()); self }
    pub fn with_summary_class(mut self, class: impl Into<String>) -> Self { self.summary_class = Some(class.into()); self }
    pub fn with_sort(mut self, sort: SortSpec) -> Self { self.sort = Some(sort); self }
    pub fn with_trace_level(mut self, level: u32) -> Self { self.trace_level = level; self }
    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }

    pub fn with_window(mut self, offset: usize, hits: usize) -> Self {
        self.offset = offset;
        self.hits = hits;
        self
    }

    /// Parses a request of the form `/?key=value&key=value`. The leading path
    /// and `?` are optional.
    pub fn from_request(request: &str) -> Result<Self, QueryError> {
        Self::from_request_with_timeout(request, DEFAULT_TIMEOUT)
    }

    /// Like [`Query::from_request`], using `default_timeout` when the request
    /// carries no `timeout` parameter.
    pub fn from_request_with_timeout(request: &str, default_timeout: Duration) -> Result<Self, QueryError> {
        let params = request.split_once('?').map_or(request, |(_, params)| params);
        let pairs = form_urlencoded::parse(params.as_bytes());
        Self::from_params(pairs.map(|(k, v)| (k.into_owned(), v.into_owned())), default_timeout)
    }

    /// Builds a query from already-decoded parameter pairs. Unknown keys are ignored.
    pub fn from_params<I, K, V>(params: I, default_timeout: Duration) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self { timeout: default_timeout, ..Self::default() };
        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "query" => query.query_string = value.to_string(),
                "streaming.userid" => {
                    query.user_id = Some(value.trim().parse().map_err(|e| QueryError::invalid(key, value, e))?);
                }
                "streaming.groupname" => query.group_name = Some(value.to_string()),
                "streaming.selection" => query.selection = Some(value.to_string()),
                "summary" | "presentation.summary" => query.summary_class = Some(value.to_string()),
                "sorting" => query.sort = Some(SortSpec::parse(value)?),
                "tracelevel" => query.trace_level = value.parse().map_err(|e| QueryError::invalid(key, value, e))?,
                "timeout" => query.timeout = parse_timeout(value).ok_or_else(|| QueryError::invalid(key, value, "expected e.g. 500ms, 2s or 1.5"))?,
                "hits" => query.hits = value.parse().map_err(|e| QueryError::invalid(key, value, e))?,
                "offset" => query.offset = value.parse().map_err(|e| QueryError::invalid(key, value, e))?,
                _ => {}
            }
        }
        Ok(query)
    }
}

fn parse_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse::<u64>().ok().map(Duration::from_millis);
    }
    let secs = value.strip_suffix('s').unwrap_or(value).trim();
    secs.parse::<f64>().ok().and_then(|s| Duration::try_from_secs_f64(s).ok())
}
