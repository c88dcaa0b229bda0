use crate::ids::DocumentId;
use serde::{Deserialize, Serialize};

/// Best-match value the server uses when no stored document cleared the
/// similarity threshold. The match-list trigger is suppressed for it.
pub const NO_MATCH_SENTINEL: &str = "No Match Found";

/// Classification and similarity verdict for one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResults {
    pub document_type: String,
    pub content_snippet: String,
    pub processing_status: String,
    pub best_match_document_id: String,
    pub best_match_similarity_score: f64,
}

impl ScanResults {
    /// The single branching invariant of the scan workflow: a ranked match
    /// list exists iff the best-match field is not the sentinel.
    pub fn has_best_match(&self) -> bool {
        self.best_match_document_id != NO_MATCH_SENTINEL
    }
}

/// A successful `/scan` response.
///
/// Immutable once rendered; a new upload produces a fresh report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub document_id: DocumentId,
    pub filename: String,
    pub filepath: String,
    pub scan_results: ScanResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_json(best_match: &str) -> String {
        format!(
            r#"{{
                "message": "Scan request received, credit deducted, document uploaded, metadata saved, text content extracted",
                "document_id": 17,
                "filename": "notes.txt",
                "filepath": "uploads/notes.txt",
                "scan_results": {{
                    "document_type": "Text Document",
                    "content_snippet": "quarterly report...",
                    "processing_status": "Similarity Matched (Word Overlap)",
                    "best_match_document_id": "{best_match}",
                    "best_match_similarity_score": 42.5
                }}
            }}"#
        )
    }

    #[test]
    fn parses_server_shaped_response_ignoring_extras() {
        let report: ScanReport = serde_json::from_str(&report_json("3")).unwrap();
        assert_eq!(report.document_id, DocumentId(17));
        assert_eq!(report.scan_results.best_match_document_id, "3");
        assert!(report.scan_results.has_best_match());
    }

    #[test]
    fn sentinel_suppresses_best_match() {
        let report: ScanReport =
            serde_json::from_str(&report_json(NO_MATCH_SENTINEL)).unwrap();
        assert!(!report.scan_results.has_best_match());
    }
}
