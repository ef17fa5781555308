use std::path::PathBuf;
use thiserror::Error;

/// What was wrong with a field during report mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaErrorKind {
    Missing,
    WrongType { expected: &'static str },
}

/// A required report field is absent or has the wrong JSON type.
///
/// `path` is dotted from the document root, e.g. `stats.group2.count` or
/// `contents.req_login.stats`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_schema_error(.path, .kind))]
pub struct SchemaError {
    pub path: String,
    pub kind: SchemaErrorKind,
}

fn describe_schema_error(path: &str, kind: &SchemaErrorKind) -> String {
    match kind {
        SchemaErrorKind::Missing => format!("missing field `{}`", path),
        SchemaErrorKind::WrongType { expected } => {
            format!("field `{}` is not {}", path, expected)
        }
    }
}

impl SchemaError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: SchemaErrorKind::Missing,
        }
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self {
            path: path.into(),
            kind: SchemaErrorKind::WrongType { expected },
        }
    }
}

/// The report file is not valid JSON.
#[derive(Debug, Error)]
#[error("invalid JSON in {}: {source}", .file.display())]
pub struct DecodeError {
    pub file: PathBuf,
    #[source]
    pub source: serde_json::Error,
}

/// Fatal, per-file failure of the report loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid report pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("schema error in {}: {source}", .file.display())]
    Schema {
        file: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// A request record lacks a metric the flattened table needs.
/// Only the affected row is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request `{request}` in run `{run}` has no `{metric}`")]
pub struct MissingMetricError {
    pub run: String,
    pub request: String,
    /// `category` or `category.sub_metric`
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown sort key `{0}` (expected one of: total, ok, ko, mean, name)")]
    UnknownSortKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_messages_name_the_path() {
        let e = SchemaError::missing("stats.group1.count");
        assert_eq!(e.to_string(), "missing field `stats.group1.count`");
        let e = SchemaError::wrong_type("contents", "an object");
        assert_eq!(e.to_string(), "field `contents` is not an object");
    }
}
