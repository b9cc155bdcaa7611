//! Namespaced block identifiers.
//!
//! Block URIs are the stable names block packs and scenarios refer to
//! (e.g. `engine:torch`). They are ordered and validated so registries built
//! from them iterate deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace assumed when a URI omits one.
pub const DEFAULT_NAMESPACE: &str = "engine";

/// Error returned when parsing an invalid [`BlockUri`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockUriError {
    /// Input was blank.
    #[error("block uri cannot be empty")]
    Empty,
    /// Namespace part was blank or malformed.
    #[error("invalid block uri namespace `{0}` (allowed: a-z0-9_.-, max 64)")]
    Namespace(String),
    /// Name part was blank or malformed.
    #[error("invalid block uri name `{0}` (allowed: a-z0-9_./-, max 128)")]
    Name(String),
}

/// A namespaced block identifier of the form `namespace:name`.
///
/// Ordering is lexical by `(namespace, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockUri {
    namespace: String,
    name: String,
}

impl BlockUri {
    /// Parse a URI, accepting `namespace:name` or a bare `name`
    /// (which uses [`DEFAULT_NAMESPACE`]).
    pub fn parse(input: &str) -> Result<Self, BlockUriError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BlockUriError::Empty);
        }

        let (namespace, name) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));
        let namespace = namespace.trim();
        let name = name.trim();

        validate_namespace(namespace)?;
        validate_name(name)?;

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// The namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name part.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BlockUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for BlockUri {
    type Err = BlockUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlockUri {
    type Error = BlockUriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BlockUri> for String {
    fn from(uri: BlockUri) -> Self {
        uri.to_string()
    }
}

fn validate_namespace(ns: &str) -> Result<(), BlockUriError> {
    let valid = !ns.is_empty()
        && ns.len() <= 64
        && ns
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(BlockUriError::Namespace(ns.to_string()))
    }
}

fn validate_name(name: &str) -> Result<(), BlockUriError> {
    let valid = !name.is_empty()
        && name.len() <= 128
        && name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'));
    if valid {
        Ok(())
    } else {
        Err(BlockUriError::Name(name.to_string()))
    }
}
