use crate::model::ElementId;
use thiserror::Error;
use uuid::Uuid;

/// A caller-supplied reference that could not be resolved to a known token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("Unknown element class: {0}")]
    UnknownClass(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Element {0} has no category")]
    NoCategory(ElementId),

    #[error("Invalid element id: {0}")]
    InvalidElementId(i64),

    #[error("No element with unique id {0}")]
    UnknownUniqueId(Uuid),

    #[error("Element {0} not found")]
    UnknownElement(ElementId),
}

/// A malformed parameter condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Unknown parameter condition: {0}")]
    UnknownCondition(String),

    #[error("Condition '{0}' only applies to text values")]
    TextOnly(String),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Coercion error: {0}")]
    Coercion(#[from] CoercionError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Unknown filter: {key}")]
    UnknownFilter { key: String },

    #[error("Malformed filter: {0}")]
    MalformedFilter(String),

    #[error("Ambiguous scope, more than one of: {}", .0.join(", "))]
    AmbiguousScope(Vec<String>),

    #[error("Invalid value for filter '{key}': expected {expected}")]
    InvalidFilterValue { key: String, expected: &'static str },

    #[error("Index {index} out of range for {len} matched elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub(crate) fn invalid_value(key: &str, expected: &'static str) -> Self {
        QueryError::InvalidFilterValue {
            key: key.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
