use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Errors raised while reshaping the survey table or deriving figures from it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("column '{0}' is not present in the survey table")]
    MissingColumn(String),

    #[error("column '{column}' row {row}: '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' has unexpected category '{value}'")]
    UnexpectedCategory { column: String, value: String },

    #[error("column '{0}' has no observations")]
    NoObservations(String),
}

/// Failure to produce the interactive bar chart for one selection pair.
///
/// Only the chart region shows it; the rest of the dashboard is unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("cannot count '{display}' by '{group_by}'")]
    Aggregation {
        display: &'static str,
        group_by: &'static str,
        #[source]
        source: DataError,
    },

    #[error("counting '{display}' by '{group_by}' aborted: {message}")]
    Aborted {
        display: &'static str,
        group_by: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = DataError::NotNumeric {
            column: "age".to_string(),
            row: 3,
            value: "old".to_string(),
        };
        assert_eq!(err.to_string(), "column 'age' row 3: 'old' is not numeric");

        let err = DataError::MissingColumn("satjob".to_string());
        assert_eq!(
            err.to_string(),
            "column 'satjob' is not present in the survey table"
        );
    }

    #[test]
    fn test_resolve_error_keeps_source() {
        let err = ResolveError::Aggregation {
            display: "satjob",
            group_by: "region",
            source: DataError::MissingColumn("region".to_string()),
        };
        assert_eq!(err.to_string(), "cannot count 'satjob' by 'region'");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("column 'region' is not present in the survey table")
        );
    }
}
