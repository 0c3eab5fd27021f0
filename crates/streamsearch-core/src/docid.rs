//! Structured document identifiers.
//!
//! Content nodes return identifiers as plain strings. `DocumentId::parse`
//! turns one into a typed value whose [`Partition`] names the user or group
//! the document was stored under. Accepted forms:
//!
//! - `id:<namespace>:<doctype>:<options>:<specific>` where `<options>` is
//!   empty, `n=<u64>` or `g=<group>`
//! - `userdoc:<namespace>:<u64>:<specific>`
//! - `groupdoc:<namespace>:<group>:<specific>`
//! - `doc:<namespace>:<specific>`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location key folded into a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Unpartitioned,
    UserId(u64),
    GroupName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdScheme {
    Id,
    Doc,
    UserDoc,
    GroupDoc,
}

impl IdScheme {
    pub fn prefix(self) -> &'static str {
        match self {
            IdScheme::Id => "id",
            IdScheme::Doc => "doc",
            IdScheme::UserDoc => "userdoc",
            IdScheme::GroupDoc => "groupdoc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdError {
    #[error("Unknown document id scheme in '{0}'")]
    UnknownScheme(String),

    #[error("Document id '{id}' is missing its {component}")]
    MissingComponent { id: String, component: &'static str },

    #[error("Invalid user id '{value}' in document id '{id}'")]
    InvalidUserId { id: String, value: String },

    #[error("Empty group name in document id '{0}'")]
    EmptyGroup(String),

    #[error("Unsupported option '{option}' in document id '{id}'")]
    UnsupportedOption { id: String, option: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    scheme: IdScheme,
    namespace: String,
    document_type: Option<String>,
    partition: Partition,
    specific: String,
}

impl DocumentId {
    /// Builds an `id:` scheme identifier.
    pub fn new(
        namespace: impl Into<String>,
        document_type: impl Into<String>,
        partition: Partition,
        specific: impl Into<String>,
    ) -> Self {
        Self {
            scheme: IdScheme::Id,
            namespace: namespace.into(),
            document_type: Some(document_type.into()),
            partition,
            specific: specific.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DocumentIdError> {
        let (scheme, rest) = raw
            .split_once(':')
            .ok_or_else(|| DocumentIdError::UnknownScheme(raw.to_string()))?;
        match scheme {
            "id" => Self::parse_id_scheme(raw, rest),
            "doc" => {
                let [namespace, specific] = split_components::<2>(raw, rest, ["namespace", "specific part"])?;
                Ok(Self {
                    scheme: IdScheme::Doc,
                    namespace: namespace.to_string(),
                    document_type: None,
                    partition: Partition::Unpartitioned,
                    specific: specific.to_string(),
                })
            }
            "userdoc" => {
                let [namespace, user, specific] =
                    split_components::<3>(raw, rest, ["namespace", "user id", "specific part"])?;
                Ok(Self {
                    scheme: IdScheme::UserDoc,
                    namespace: namespace.to_string(),
                    document_type: None,
                    partition: Partition::UserId(parse_user_id(raw, user)?),
                    specific: specific.to_string(),
                })
            }
            "groupdoc" => {
                let [namespace, group, specific] =
                    split_components::<3>(raw, rest, ["namespace", "group name", "specific part"])?;
                if group.is_empty() {
                    return Err(DocumentIdError::EmptyGroup(raw.to_string()));
                }
                Ok(Self {
                    scheme: IdScheme::GroupDoc,
                    namespace: namespace.to_string(),
                    document_type: None,
                    partition: Partition::GroupName(group.to_string()),
                    specific: specific.to_string(),
                })
            }
            _ => Err(DocumentIdError::UnknownScheme(raw.to_string())),
        }
    }

    fn parse_id_scheme(raw: &str, rest: &str) -> Result<Self, DocumentIdError> {
        let [namespace, document_type, options, specific] = split_components::<4>(
            raw,
            rest,
            ["namespace", "document type", "key/value options", "specific part"],
        )?;
        if document_type.is_empty() {
            return Err(DocumentIdError::MissingComponent { id: raw.to_string(), component: "document type" });
        }
        let partition = match options.split_once('=') {
            None if options.is_empty() => Partition::Unpartitioned,
            Some(("n", value)) => Partition::UserId(parse_user_id(raw, value)?),
            Some(("g", "")) => return Err(DocumentIdError::EmptyGroup(raw.to_string())),
            Some(("g", group)) => Partition::GroupName(group.to_string()),
            _ => {
                return Err(DocumentIdError::UnsupportedOption {
                    id: raw.to_string(),
                    option: options.to_string(),
                })
            }
        };
        Ok(Self {
            scheme: IdScheme::Id,
            namespace: namespace.to_string(),
            document_type: Some(document_type.to_string()),
            partition,
            specific: specific.to_string(),
        })
    }

    pub fn scheme(&self) -> IdScheme { self.scheme }
    pub fn namespace(&self) -> &str { &self.namespace }
    pub fn document_type(&self) -> Option<&str> { self.document_type.as_deref() }
    pub fn partition(&self) -> &Partition { &self.partition }
    pub fn specific(&self) -> &str { &self.specific }
}

/// Splits `rest` into exactly `N` colon-separated parts; the last part keeps
/// any remaining colons.
fn split_components<'a, const N: usize>(
    raw: &str,
    rest: &'a str,
    names: [&'static str; N],
) -> Result<[&'a str; N], DocumentIdError> {
    let mut parts = [""; N];
    let mut iter = rest.splitn(N, ':');
    for (slot, name) in parts.iter_mut().zip(names) {
        *slot = iter
            .next()
            .ok_or_else(|| DocumentIdError::MissingComponent { id: raw.to_string(), component: name })?;
    }
    Ok(parts)
}

/// User ids must be canonical decimal (no sign, no leading zeros) so that
/// `Display` reproduces the parsed text.
fn parse_user_id(raw: &str, value: &str) -> Result<u64, DocumentIdError> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));
    if !canonical {
        return Err(DocumentIdError::InvalidUserId { id: raw.to_string(), value: value.to_string() });
    }
    value
        .parse()
        .map_err(|_| DocumentIdError::InvalidUserId { id: raw.to_string(), value: value.to_string() })
}

impl FromStr for DocumentId {
    type Err = DocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.scheme.prefix();
        match (self.scheme, &self.partition) {
            (IdScheme::Id, partition) => {
                let doctype = self.document_type.as_deref().unwrap_or_default();
                write!(f, "{prefix}:{}:{doctype}:", self.namespace)?;
                match partition {
                    Partition::Unpartitioned => {}
                    Partition::UserId(user) => write!(f, "n={user}")?,
                    Partition::GroupName(group) => write!(f, "g={group}")?,
                }
                write!(f, ":{}", self.specific)
            }
            (IdScheme::UserDoc, Partition::UserId(user)) => {
                write!(f, "{prefix}:{}:{user}:{}", self.namespace, self.specific)
            }
            (IdScheme::GroupDoc, Partition::GroupName(group)) => {
                write!(f, "{prefix}:{}:{group}:{}", self.namespace, self.specific)
            }
            _ => write!(f, "{prefix}:{}:{}", self.namespace, self.specific),
        }
    }
}
