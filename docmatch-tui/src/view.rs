//! Pure view models: scan report and match list formatting, profile lines.
//!
//! Rendering rebuilds these from state every frame, so drawing twice can
//! never duplicate anything; the match trigger in particular exists at most
//! once per view regardless of how often the view is constructed.

use docmatch_model::{
    AnalyticsReport, DocumentId, MatchEntry, PendingCreditRequest, ScanReport,
    UserProfile,
};

/// Notice shown in place of the profile when nobody is logged in.
pub const ANONYMOUS_NOTICE: &str =
    "You are not logged in. Log in or register to access your profile.";

/// Renderable form of one scan report.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResultsView {
    /// Label/value rows in display order.
    pub rows: Vec<(&'static str, String)>,
    /// Present iff the report names a best match; carries the id the lazy
    /// match-list fetch needs.
    pub match_trigger: Option<DocumentId>,
}

/// Build the scan results view. Pure; no side effects beyond the return.
pub fn scan_results_view(report: &ScanReport) -> ScanResultsView {
    let results = &report.scan_results;
    let rows = vec![
        ("Document Type", results.document_type.clone()),
        ("Content Snippet", results.content_snippet.clone()),
        ("Processing Status", results.processing_status.clone()),
        ("Filename", report.filename.clone()),
        ("Filepath", report.filepath.clone()),
        ("Document ID", report.document_id.to_string()),
        ("Best Match", results.best_match_document_id.clone()),
        ("Best Match Score", fmt_score(results.best_match_similarity_score)),
    ];

    ScanResultsView {
        rows,
        match_trigger: results.has_best_match().then_some(report.document_id),
    }
}

/// One match entry line, e.g. `a.pdf 92% match`.
pub fn match_line(entry: &MatchEntry) -> String {
    format!("{} {}% match", entry.filename, fmt_score(entry.similarity_score))
}

/// Match list lines in server order.
pub fn match_lines(entries: &[MatchEntry]) -> Vec<String> {
    entries.iter().map(match_line).collect()
}

/// Profile panel lines for an authenticated session.
pub fn profile_lines(profile: &UserProfile) -> Vec<String> {
    vec![
        format!("Username: {}", profile.username),
        format!("Credits: {}", profile.credits),
        format!("Role: {}", profile.role),
    ]
}

/// One pending-requests table row.
pub fn pending_line(request: &PendingCreditRequest) -> String {
    format!(
        "{}  {} credits  {}",
        request.username,
        request.requested_credits,
        request.request_date.format("%Y-%m-%d %H:%M")
    )
}

/// Analytics panel lines: scans per user per day, common topics, top users,
/// and the credit usage statistics.
pub fn analytics_lines(report: &AnalyticsReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Scans Per User Per Day".to_string());
    for item in &report.scans_per_user {
        lines.push(format!(
            "  {} - {}: {}",
            item.username, item.scan_day, item.scan_count
        ));
    }

    lines.push("Most Common Topics".to_string());
    for item in &report.common_topics {
        lines.push(format!("  {}: {}", item.topic, item.scan_count));
    }

    lines.push("Top Users".to_string());
    for user in &report.top_users {
        lines.push(format!(
            "  {}: {} scans, {} credits used",
            user.username, user.total_scans, user.total_credits_used
        ));
    }

    let stats = &report.credit_stats;
    lines.push("Credit Usage".to_string());
    lines.push(format!("  Total Credits Used: {}", stats.total_credits_used));
    lines.push(format!(
        "  Average Credits Used: {:.2}",
        stats.avg_credits_used
    ));
    lines.push(format!("  Approved Credits: {}", stats.approved_credits));
    lines.push(format!("  Pending Credits: {}", stats.pending_credits));

    lines
}

/// Scores arrive as JSON numbers; render whole values without the trailing
/// `.0` the float formatter would add.
fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 && score.is_finite() {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}
