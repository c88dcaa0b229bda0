//! Pure UI state for the scanner client.
//!
//! Everything here is plain data plus transition helpers; no I/O. The event
//! loop in `app` feeds network completions into these types and the
//! renderer in `ui` draws whatever they currently hold.

use docmatch_client::ApiError;
use docmatch_model::{
    Acknowledgement, AnalyticsReport, MatchEntry, PendingCreditRequest,
    ScanReport, UserProfile,
};
use tracing::warn;

/// Identity state as last observed by the session gate.
///
/// `Unknown` covers both "not fetched yet" and "fetch failed"; it renders
/// exactly like `Anonymous` and arms the same primary action, per the
/// gate's no-retry contract.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unknown,
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.profile().is_some_and(|p| p.role.is_admin())
    }

    /// What the primary auth control does right now.
    pub fn primary_action(&self) -> AuthAction {
        match self {
            SessionState::Authenticated(_) => AuthAction::Logout,
            _ => AuthAction::GoToLogin,
        }
    }
}

/// The two meanings of the primary auth control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    GoToLogin,
    Logout,
}

/// Settle the one profile read the session gate performs at startup.
///
/// 401 (mapped to `Ok(None)` by the client) is anonymous; any other failure
/// is logged and leaves the gate in its unauthenticated-looking default.
pub fn settle_profile(
    result: Result<Option<UserProfile>, ApiError>,
) -> SessionState {
    match result {
        Ok(Some(profile)) => SessionState::Authenticated(profile),
        Ok(None) => SessionState::Anonymous,
        Err(err) => {
            warn!(error = %err, "profile fetch failed");
            SessionState::Unknown
        }
    }
}

/// Scan workflow states. One attempt per user trigger, no retries.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    Idle,
    Uploading,
    Success(ScanReport),
    Unauthorized(String),
    Failed(String),
}

impl ScanPhase {
    pub fn is_uploading(&self) -> bool {
        matches!(self, ScanPhase::Uploading)
    }

    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            ScanPhase::Success(report) => Some(report),
            _ => None,
        }
    }

    /// The results container is revealed only for a successful scan.
    pub fn results_visible(&self) -> bool {
        self.report().is_some()
    }
}

/// The lazily loaded similarity list panel.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPanel {
    Hidden,
    Loading,
    Loaded(Vec<MatchEntry>),
    Failed(String),
}

/// Color cue for the shared status line, mirroring the original
/// orange/green/red text styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Busy,
    Success,
    Error,
}

/// One shared status line at the bottom of every screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    pub fn idle() -> Self {
        Self {
            text: String::new(),
            tone: Tone::Neutral,
        }
    }

    pub fn busy(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Busy,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

/// Loading state for one independently fetched admin section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> SectionState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            SectionState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Admin dashboard state: pending credit requests plus the analytics
/// snapshot, each failing independently.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminState {
    pub pending: SectionState<Vec<PendingCreditRequest>>,
    pub analytics: SectionState<AnalyticsReport>,
    pub selected: usize,
}

impl AdminState {
    pub fn loading() -> Self {
        Self {
            pending: SectionState::Loading,
            analytics: SectionState::Loading,
            selected: 0,
        }
    }

    pub fn selected_request(&self) -> Option<&PendingCreditRequest> {
        self.pending.loaded().and_then(|rows| rows.get(self.selected))
    }

    pub fn select_next(&mut self) {
        let len = self.pending.loaded().map_or(0, Vec::len);
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.pending.loaded().map_or(0, Vec::len);
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Fold an approve/reject acknowledgement into the selection so the
    /// cursor stays in range after the list reloads shorter.
    pub fn settle_decision(
        &mut self,
        result: Result<Acknowledgement, ApiError>,
    ) -> StatusLine {
        match result {
            Ok(ack) => {
                self.pending = SectionState::Loading;
                self.selected = 0;
                StatusLine::success(ack.message)
            }
            Err(err) => StatusLine::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_model::Role;

    fn alice() -> UserProfile {
        UserProfile {
            username: "alice".into(),
            credits: 5,
            role: Role::Admin,
        }
    }

    #[test]
    fn unauthorized_profile_settles_to_anonymous_with_login_action() {
        let session = settle_profile(Ok(None));
        assert_eq!(session, SessionState::Anonymous);
        assert_eq!(session.primary_action(), AuthAction::GoToLogin);
    }

    #[test]
    fn failed_profile_keeps_the_unauthenticated_default() {
        let err = ApiError::Http {
            status: docmatch_client::reqwest::StatusCode::BAD_GATEWAY,
        };
        let session = settle_profile(Err(err));
        assert_eq!(session, SessionState::Unknown);
        assert_eq!(session.primary_action(), AuthAction::GoToLogin);
    }

    #[test]
    fn authenticated_profile_arms_logout() {
        let session = settle_profile(Ok(Some(alice())));
        assert_eq!(session.primary_action(), AuthAction::Logout);
        assert!(session.is_admin());
    }

    #[test]
    fn results_only_visible_after_success() {
        assert!(!ScanPhase::Idle.results_visible());
        assert!(!ScanPhase::Uploading.results_visible());
        assert!(!ScanPhase::Failed("HTTP error 500".into()).results_visible());
    }

    #[test]
    fn admin_selection_wraps_and_survives_decisions() {
        let row = PendingCreditRequest {
            id: 1,
            username: "bob".into(),
            requested_credits: 5,
            request_date: chrono_now(),
        };
        let mut admin = AdminState {
            pending: SectionState::Loaded(vec![row.clone(), row]),
            analytics: SectionState::Loading,
            selected: 1,
        };
        admin.select_next();
        assert_eq!(admin.selected, 0);

        let status = admin.settle_decision(Ok(Acknowledgement {
            message: "Request 1 approved".into(),
        }));
        assert_eq!(status.tone, Tone::Success);
        assert_eq!(admin.pending, SectionState::Loading);
        assert_eq!(admin.selected, 0);
    }

    fn chrono_now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}
