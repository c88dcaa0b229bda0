//! Scan workflow controller: `Idle -> Uploading -> Success | Unauthorized |
//! Failed`, with the entry guard and settlement rules of the scan screen.
//!
//! These are pure transition functions; the event loop owns the actual
//! request dispatch and feeds the result back through [`settle_scan`].

use std::path::{Path, PathBuf};

use docmatch_client::ApiError;
use docmatch_model::ScanReport;

use crate::state::{MatchPanel, ScanPhase, StatusLine};

/// Outcome of asking the controller to start an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadGate {
    /// Guards passed; dispatch the upload for this file.
    Start(PathBuf),
    /// An upload is already in flight; the trigger is ignored.
    Busy,
    /// No file selected. Local validation only, nothing is sent.
    MissingFile,
}

/// Entry guard for the scan trigger.
pub fn gate_upload(file_input: &str, phase: &ScanPhase) -> UploadGate {
    if phase.is_uploading() {
        return UploadGate::Busy;
    }
    let trimmed = file_input.trim();
    if trimmed.is_empty() {
        return UploadGate::MissingFile;
    }
    UploadGate::Start(PathBuf::from(trimmed))
}

/// Filename sent as the multipart part name, mirroring what a browser file
/// input would submit.
pub fn upload_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Everything the UI needs to apply once a scan attempt resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettled {
    pub phase: ScanPhase,
    pub status: StatusLine,
    pub matches: MatchPanel,
    /// 401 redirects to the login screen after surfacing the message.
    pub go_to_login: bool,
}

/// Settle one scan attempt.
///
/// Unauthorized is an exhaustive case: it consumes the response message and
/// short-circuits; the generic failure arm below never sees a 401.
pub fn settle_scan(result: Result<ScanReport, ApiError>) -> ScanSettled {
    match result {
        Ok(report) => ScanSettled {
            phase: ScanPhase::Success(report),
            status: StatusLine::success("Scan completed successfully!"),
            matches: MatchPanel::Hidden,
            go_to_login: false,
        },
        Err(ApiError::Unauthorized { message }) => ScanSettled {
            phase: ScanPhase::Unauthorized(message.clone()),
            status: StatusLine::error(format!(
                "Scan request unauthorized: {message}. Redirecting to login..."
            )),
            matches: MatchPanel::Hidden,
            go_to_login: true,
        },
        Err(err) => ScanSettled {
            phase: ScanPhase::Failed(err.to_string()),
            status: StatusLine::error(format!("Error during scan: {err}")),
            matches: MatchPanel::Hidden,
            go_to_login: false,
        },
    }
}

/// Settle one lazy match-list fetch.
pub fn settle_matches(
    result: Result<Vec<docmatch_model::MatchEntry>, ApiError>,
) -> MatchPanel {
    match result {
        Ok(entries) => MatchPanel::Loaded(entries),
        Err(err) => {
            tracing::warn!(error = %err, "match list fetch failed");
            MatchPanel::Failed(
                "Error loading matches. Please try again.".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_client::reqwest::StatusCode;
    use docmatch_model::{DocumentId, ScanResults};

    fn report() -> ScanReport {
        ScanReport {
            document_id: DocumentId(17),
            filename: "notes.txt".into(),
            filepath: "uploads/notes.txt".into(),
            scan_results: ScanResults {
                document_type: "Text Document".into(),
                content_snippet: "quarterly report...".into(),
                processing_status: "Similarity Matched (Word Overlap)".into(),
                best_match_document_id: "3".into(),
                best_match_similarity_score: 42.5,
            },
        }
    }

    #[test]
    fn missing_file_is_rejected_before_any_request() {
        assert_eq!(gate_upload("   ", &ScanPhase::Idle), UploadGate::MissingFile);
    }

    #[test]
    fn overlapping_uploads_are_ignored() {
        assert_eq!(
            gate_upload("notes.txt", &ScanPhase::Uploading),
            UploadGate::Busy
        );
    }

    #[test]
    fn retrigger_is_allowed_from_any_terminal_phase() {
        for phase in [
            ScanPhase::Idle,
            ScanPhase::Success(report()),
            ScanPhase::Unauthorized("expired".into()),
            ScanPhase::Failed("HTTP error 500".into()),
        ] {
            assert_eq!(
                gate_upload("notes.txt", &phase),
                UploadGate::Start(PathBuf::from("notes.txt"))
            );
        }
    }

    #[test]
    fn http_failure_surfaces_the_status_and_keeps_results_hidden() {
        let settled = settle_scan(Err(ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }));
        assert!(settled.status.text.contains("500"));
        assert!(!settled.phase.results_visible());
        assert!(!settled.go_to_login);
    }

    #[test]
    fn unauthorized_short_circuits_into_the_login_redirect() {
        let settled = settle_scan(Err(ApiError::Unauthorized {
            message: "Session expired".into(),
        }));
        assert!(matches!(settled.phase, ScanPhase::Unauthorized(_)));
        assert!(settled.status.text.contains("Session expired"));
        assert!(settled.go_to_login);
    }

    #[test]
    fn success_reveals_results_and_clears_the_match_panel() {
        let settled = settle_scan(Ok(report()));
        assert!(settled.phase.results_visible());
        assert_eq!(settled.matches, MatchPanel::Hidden);
    }

    #[test]
    fn failed_match_fetch_renders_a_single_error_line() {
        let panel = settle_matches(Err(ApiError::Http {
            status: StatusCode::NOT_FOUND,
        }));
        assert_eq!(
            panel,
            MatchPanel::Failed("Error loading matches. Please try again.".into())
        );
    }

    #[test]
    fn upload_filename_strips_directories() {
        assert_eq!(
            upload_filename(Path::new("/tmp/docs/notes.txt")),
            "notes.txt"
        );
    }
}
