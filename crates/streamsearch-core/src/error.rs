use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MISSING_SELECTION: &str = "Streaming search needs one and only one of selection, user id, or group name.";

/// Stable error categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    MissingSelection,
    BackendCommunicationError,
    TimedOut,
}

impl ErrorCategory {
    pub fn code(self) -> u32 {
        match self {
            ErrorCategory::MissingSelection => 4,
            ErrorCategory::BackendCommunicationError => 10,
            ErrorCategory::TimedOut => 12,
        }
    }

    /// Headline shown next to the detailed message. A missing selection is
    /// reported under the same headline as backend failures.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCategory::MissingSelection | ErrorCategory::BackendCommunicationError => "Backend communication error",
            ErrorCategory::TimedOut => "Timed out",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorCategory::TimedOut)
    }
}

/// Failure raised by a visitor while running its remote visit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum VisitError {
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Tokenize(String),

    #[error("{0}")]
    Interrupted(String),

    #[error("{0}")]
    TimedOut(String),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Terminal failure of a streaming search. `Display` yields the detailed message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{}", MISSING_SELECTION)]
    MissingSelection,

    #[error("Failed to parse document selection string: {0}")]
    SelectionParse(String),

    #[error("Failed to tokenize document selection string: {0}")]
    SelectionTokenize(String),

    #[error("{0}")]
    Interrupted(String),

    #[error("{0}")]
    TimedOut(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Did not find summary for hit with document id {0}")]
    MissingSummary(String),

    #[error("Missing hit summary data for {0} hits")]
    IncompleteSummaries(usize),
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::MissingSelection => ErrorCategory::MissingSelection,
            SearchError::TimedOut(_) | SearchError::IncompleteSummaries(_) => ErrorCategory::TimedOut,
            SearchError::SelectionParse(_)
            | SearchError::SelectionTokenize(_)
            | SearchError::Interrupted(_)
            | SearchError::InvalidArgument(_)
            | SearchError::MissingSummary(_) => ErrorCategory::BackendCommunicationError,
        }
    }

    pub fn message(&self) -> &'static str {
        self.category().message()
    }

    pub fn detail(&self) -> String {
        self.to_string()
    }

    pub fn to_error_message(&self) -> ErrorMessage {
        ErrorMessage {
            code: self.category().code(),
            error_category: self.category(),
            message: self.message().to_string(),
            detail: self.detail(),
        }
    }
}

impl From<VisitError> for SearchError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::Parse(msg) => SearchError::SelectionParse(msg),
            VisitError::Tokenize(msg) => SearchError::SelectionTokenize(msg),
            VisitError::Interrupted(msg) => SearchError::Interrupted(msg),
            VisitError::TimedOut(msg) => SearchError::TimedOut(msg),
            VisitError::InvalidArgument(msg) => SearchError::InvalidArgument(msg),
        }
    }
}

/// Serializable error report handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: u32,
    pub error_category: ErrorCategory,
    pub message: String,
    pub detail: String,
}

pub type Result<T> = std::result::Result<T, SearchError>;
