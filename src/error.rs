// ⚠️ Error taxonomy
// Every pipeline failure is surfaced to the caller as one of these.

use std::path::PathBuf;

// ============================================================================
// SOURCE ERRORS (parse stage)
// ============================================================================

/// Failure while reading or joining the XML / CSV sources.
///
/// Parsing is all-or-nothing: any of these aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("The {source_type} contains no elements")]
    EmptyDocument { source_type: String },

    /// `index` is 1-based, in document order
    #[error("Car #{index} is missing required element <{field}>")]
    MissingField { index: usize, field: &'static str },

    #[error("Car #{index} has a <price> without a currency attribute")]
    MissingCurrency { index: usize },

    #[error("Car #{index} has an invalid {currency} price: {value:?}")]
    InvalidPrice {
        index: usize,
        currency: String,
        value: String,
    },

    #[error("Release date {value:?} for brand {brand} is not MM/DD/YYYY")]
    InvalidReleaseDate { brand: String, value: String },
}

// ============================================================================
// PIPELINE ERRORS (filter / sort stages)
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Unsupported filter type: {0}")]
    UnsupportedFilter(String),

    #[error("Malformed value {value:?} for filter {kind}: {reason}")]
    MalformedFilterValue {
        kind: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported sort option: {0}")]
    UnsupportedSort(String),
}

impl PipelineError {
    pub(crate) fn malformed(kind: &str, value: &str, reason: impl Into<String>) -> Self {
        PipelineError::MalformedFilterValue {
            kind: kind.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = SourceError::MissingField { index: 3, field: "model" };
        assert_eq!(err.to_string(), "Car #3 is missing required element <model>");

        let err = PipelineError::UnsupportedSort("colour".to_string());
        assert_eq!(err.to_string(), "Unsupported sort option: colour");

        let err = PipelineError::malformed("brand-price", "Toyota", "expected brand,minPrice,maxPrice");
        assert!(err.to_string().contains("brand-price"));
        assert!(err.to_string().contains("expected brand,minPrice,maxPrice"));
    }

    #[test]
    fn test_source_error_is_transparent_in_pipeline_error() {
        let err: PipelineError = SourceError::MissingCurrency { index: 1 }.into();
        assert_eq!(
            err.to_string(),
            "Car #1 has a <price> without a currency attribute"
        );
    }
}
