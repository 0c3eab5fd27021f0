//! Partition scoping for streaming search.
//!
//! A streaming query names the slice of the corpus it wants: one user, one
//! group, or an arbitrary document selection. The predicate derived here is
//! used twice: to build the selection sent to the content cluster, and to
//! re-check every identifier the cluster sends back.

use crate::docid::{DocumentId, Partition};
use crate::error::SearchError;
use crate::query::Query;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionPredicate {
    Unconstrained,
    UserConstrained(u64),
    GroupConstrained(String),
}

impl PartitionPredicate {
    /// User id wins over group name, which wins over a free-form selection.
    pub fn from_query(query: &Query) -> Result<Self, SearchError> {
        if let Some(user) = query.user_id {
            Ok(Self::UserConstrained(user))
        } else if let Some(group) = &query.group_name {
            Ok(Self::GroupConstrained(group.clone()))
        } else if query.selection.is_some() {
            Ok(Self::Unconstrained)
        } else {
            Err(SearchError::MissingSelection)
        }
    }

    pub fn admits(&self, id: &DocumentId) -> bool {
        match (self, id.partition()) {
            (Self::Unconstrained, _) => true,
            (Self::UserConstrained(expected), Partition::UserId(actual)) => expected == actual,
            (Self::GroupConstrained(expected), Partition::GroupName(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Whether a raw identifier returned by the backend may be shown to the
/// caller of a query scoped by `predicate`.
///
/// Identifiers that do not parse are never admissible. Under an unconstrained
/// predicate every parseable identifier is accepted whatever its partition
/// style, so `allow_any_if_unconstrained` cannot widen acceptance beyond that.
pub fn admissible(identifier: &str, predicate: &PartitionPredicate, allow_any_if_unconstrained: bool) -> bool {
    match DocumentId::parse(identifier) {
        Ok(id) => match predicate {
            PartitionPredicate::Unconstrained if allow_any_if_unconstrained => true,
            _ => predicate.admits(&id),
        },
        Err(_) => false,
    }
}

/// Renders the document selection expression a visitor hands to the content
/// cluster, restricted to `document_type`. `None` when the query names no
/// partition at all.
pub fn document_selection(query: &Query, document_type: &str) -> Option<String> {
    let expression = if let Some(user) = query.user_id {
        format!("id.user=={user}")
    } else if let Some(group) = &query.group_name {
        format!("id.group==\"{}\"", escape_string(group))
    } else {
        query.selection.clone()?
    };
    Some(format!("{document_type} and ( {expression} )"))
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
