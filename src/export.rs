//! Structured JSON and tabular CSV exports of page results

mod structured;
mod tabular;

pub use structured::{
    EXPORT_FORMAT, ExportMetadata, ExportSummary, ExportedContent, ExportedLinks, ExportedPage,
    StructuredExport, create_structured_export,
};
pub use tabular::to_csv;

use crate::error::Error as CrateError;
use serde::Serialize;
use thiserror::Error;

/// Error building an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<ExportError> for CrateError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Json(e) => CrateError::Json(e),
            _ => CrateError::Export(err.to_string()),
        }
    }
}

/// Serialize to JSON. Non-ASCII text is written as-is; `pretty` indents by
/// two spaces.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_keeps_unicode() {
        let value = json!({"title": "Überblick ✓"});
        assert_eq!(to_json(&value, false).unwrap(), r#"{"title":"Überblick ✓"}"#);
        assert_eq!(
            to_json(&value, true).unwrap(),
            "{\n  \"title\": \"Überblick ✓\"\n}"
        );
    }
}
