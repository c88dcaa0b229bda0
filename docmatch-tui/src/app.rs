//! Application state and the event loop.
//!
//! One UI task owns all state; network calls run on the tokio runtime and
//! report back as [`AppEvent`]s drained at the top of every frame. Nothing
//! in flight is ever cancelled, and no call is retried; the user re-arms an
//! action by triggering it again.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use docmatch_client::{ApiClient, ApiError};
use docmatch_model::{
    Acknowledgement, AnalyticsReport, AuthOutcome, MatchEntry,
    PendingCreditRequest, ScanReport, UserProfile,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::warn;

use crate::event::{EventSource, event_source_from_env};
use crate::state::{
    AdminState, AuthAction, MatchPanel, ScanPhase, SectionState, SessionState,
    StatusLine, settle_profile,
};
use crate::ui;
use crate::workflow::{self, UploadGate};

/// Which screen the stack currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Scanner,
    Login,
    Register,
    Admin,
}

/// Input focus on the scanner screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    None,
    FilePath,
    CreditAmount,
}

/// Username/password pair for the login and register forms.
#[derive(Debug, Clone, Default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    pub focus_password: bool,
}

impl CredentialsForm {
    fn active_field(&mut self) -> &mut String {
        if self.focus_password {
            &mut self.password
        } else {
            &mut self.username
        }
    }
}

/// Completions reported back by network tasks.
#[derive(Debug)]
pub enum AppEvent {
    Profile(Result<Option<UserProfile>, ApiError>),
    LoginDone(Result<AuthOutcome, ApiError>),
    RegisterDone(Result<AuthOutcome, ApiError>),
    LogoutDone(Result<(), ApiError>),
    ScanDone(Result<ScanReport, ApiError>),
    MatchesDone(Result<Vec<MatchEntry>, ApiError>),
    CreditDone(Result<Acknowledgement, ApiError>),
    PendingLoaded(Result<Vec<PendingCreditRequest>, ApiError>),
    AnalyticsLoaded(Result<AnalyticsReport, ApiError>),
    DecisionDone(Result<Acknowledgement, ApiError>),
}

pub struct App {
    client: ApiClient,
    handle: Handle,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,

    pub screen: Screen,
    pub session: SessionState,
    pub scan: ScanPhase,
    pub matches: MatchPanel,
    pub status: StatusLine,
    pub file_input: String,
    pub credit_input: String,
    pub focus: Focus,
    pub login_form: CredentialsForm,
    pub register_form: CredentialsForm,
    pub admin: AdminState,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("session", &self.session)
            .field("scan", &self.scan)
            .finish()
    }
}

impl App {
    pub fn new(client: ApiClient, handle: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            client,
            handle,
            events_tx,
            events_rx,
            screen: Screen::Scanner,
            session: SessionState::Unknown,
            scan: ScanPhase::Idle,
            matches: MatchPanel::Hidden,
            status: StatusLine::idle(),
            file_input: String::new(),
            credit_input: String::new(),
            focus: Focus::None,
            login_form: CredentialsForm::default(),
            register_form: CredentialsForm::default(),
            admin: AdminState::loading(),
        }
    }

    fn spawn<F>(&self, fut: F)
    where
        F: std::future::Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        self.handle.spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    /// Session gate: one profile read, no retry.
    pub fn refresh_session(&self) {
        let client = self.client.clone();
        self.spawn(async move { AppEvent::Profile(client.profile().await) });
    }

    fn try_recv(&mut self) -> Option<AppEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Scan trigger: guard, read the file, then dispatch one upload.
    fn trigger_scan(&mut self) {
        match workflow::gate_upload(&self.file_input, &self.scan) {
            UploadGate::Busy => {}
            UploadGate::MissingFile => {
                self.status =
                    StatusLine::error("Please select a document to upload.");
            }
            UploadGate::Start(path) => match std::fs::read(&path) {
                Err(err) => {
                    self.status = StatusLine::error(format!(
                        "Unable to read {}: {err}",
                        path.display()
                    ));
                }
                Ok(contents) => {
                    self.scan = ScanPhase::Uploading;
                    self.matches = MatchPanel::Hidden;
                    self.status =
                        StatusLine::busy("Uploading and scanning...");
                    let filename = workflow::upload_filename(&path);
                    let client = self.client.clone();
                    self.spawn(async move {
                        AppEvent::ScanDone(
                            client.scan(&filename, contents).await,
                        )
                    });
                }
            },
        }
    }

    /// Match lazy-loader: only armed once a successful scan named a best
    /// match; every activation re-fetches.
    fn trigger_matches(&mut self) {
        let Some(report) = self.scan.report() else {
            return;
        };
        if !report.scan_results.has_best_match() {
            return;
        }
        let document_id = report.document_id;
        self.matches = MatchPanel::Loading;
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::MatchesDone(client.matches(document_id).await)
        });
    }

    fn submit_credit_request(&mut self) {
        let Ok(amount) = self.credit_input.trim().parse::<u32>() else {
            self.status = StatusLine::error("Enter a credit amount.");
            return;
        };
        self.status = StatusLine::busy("Submitting credit request...");
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::CreditDone(client.request_credits(amount).await)
        });
    }

    fn submit_login(&mut self) {
        let username = self.login_form.username.clone();
        let password = self.login_form.password.clone();
        self.status = StatusLine::busy("Logging in...");
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::LoginDone(client.login(&username, &password).await)
        });
    }

    fn submit_register(&mut self) {
        let username = self.register_form.username.clone();
        let password = self.register_form.password.clone();
        self.status = StatusLine::busy("Registering...");
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::RegisterDone(client.register(&username, &password).await)
        });
    }

    fn primary_auth_action(&mut self) {
        match self.session.primary_action() {
            AuthAction::GoToLogin => {
                self.login_form = CredentialsForm::default();
                self.screen = Screen::Login;
            }
            AuthAction::Logout => {
                let client = self.client.clone();
                self.spawn(async move {
                    AppEvent::LogoutDone(client.logout().await)
                });
            }
        }
    }

    fn enter_admin(&mut self) {
        if !self.session.is_admin() {
            return;
        }
        self.screen = Screen::Admin;
        self.admin = AdminState::loading();
        self.load_pending();
        self.load_analytics();
    }

    fn load_pending(&self) {
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::PendingLoaded(client.pending_credit_requests().await)
        });
    }

    fn load_analytics(&self) {
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::AnalyticsLoaded(client.analytics().await)
        });
    }

    fn decide_selected(&mut self, approve: bool) {
        let Some(request) = self.admin.selected_request() else {
            return;
        };
        let id = request.id;
        let client = self.client.clone();
        self.spawn(async move {
            let result = if approve {
                client.approve_credit_request(id).await
            } else {
                client.reject_credit_request(id).await
            };
            AppEvent::DecisionDone(result)
        });
    }

    /// Fold one network completion into the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Profile(result) => {
                self.session = settle_profile(result);
            }
            AppEvent::LoginDone(Ok(_)) => {
                self.status =
                    StatusLine::success("Login successful! Redirecting...");
                self.screen = Screen::Scanner;
                self.refresh_session();
            }
            AppEvent::LoginDone(Err(err)) => {
                let text = match err {
                    ApiError::Network(_) => {
                        "Login failed: Network error.".to_string()
                    }
                    ApiError::Rejected { message }
                    | ApiError::Unauthorized { message } => {
                        format!("Login failed: {message}")
                    }
                    _ => "Login failed: Invalid username or password."
                        .to_string(),
                };
                self.status = StatusLine::error(text);
            }
            AppEvent::RegisterDone(Ok(_)) => {
                self.status = StatusLine::success(
                    "Registration successful! Redirecting to login...",
                );
                self.login_form = CredentialsForm::default();
                self.screen = Screen::Login;
            }
            AppEvent::RegisterDone(Err(err)) => {
                let text = match err {
                    ApiError::Rejected { message } => message,
                    other => {
                        warn!(error = %other, "registration failed");
                        "Registration failed".to_string()
                    }
                };
                self.status = StatusLine::error(text);
            }
            AppEvent::LogoutDone(Ok(())) => {
                // The browser client navigates back to the landing page
                // here; scan state does not survive that navigation.
                self.session = SessionState::Anonymous;
                self.scan = ScanPhase::Idle;
                self.matches = MatchPanel::Hidden;
                self.status = StatusLine::success("Logged out.");
            }
            AppEvent::LogoutDone(Err(err)) => {
                warn!(error = %err, "logout failed");
            }
            AppEvent::ScanDone(result) => {
                let settled = workflow::settle_scan(result);
                self.scan = settled.phase;
                self.matches = settled.matches;
                self.status = settled.status;
                if settled.go_to_login {
                    self.login_form = CredentialsForm::default();
                    self.screen = Screen::Login;
                }
            }
            AppEvent::MatchesDone(result) => {
                self.matches = workflow::settle_matches(result);
            }
            AppEvent::CreditDone(Ok(ack)) => {
                self.status = StatusLine::success(ack.message);
            }
            AppEvent::CreditDone(Err(ApiError::Validation(message))) => {
                self.status = StatusLine::error(message);
            }
            AppEvent::CreditDone(Err(err)) => {
                self.status = StatusLine::error(format!(
                    "Failed to submit credit request: {err}"
                ));
            }
            AppEvent::PendingLoaded(Ok(rows)) => {
                self.admin.selected = 0;
                self.admin.pending = SectionState::Loaded(rows);
            }
            AppEvent::PendingLoaded(Err(err)) => {
                self.admin.pending = SectionState::Failed(err.to_string());
            }
            AppEvent::AnalyticsLoaded(Ok(report)) => {
                self.admin.analytics = SectionState::Loaded(report);
            }
            AppEvent::AnalyticsLoaded(Err(err)) => {
                self.admin.analytics = SectionState::Failed(err.to_string());
            }
            AppEvent::DecisionDone(result) => {
                let reload = result.is_ok();
                self.status = self.admin.settle_decision(result);
                if reload {
                    self.load_pending();
                }
            }
        }
    }

    /// Handle one key. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            return true;
        }

        match self.screen {
            Screen::Scanner => self.handle_scanner_key(key),
            Screen::Login => {
                self.handle_credentials_key(key, true);
                false
            }
            Screen::Register => {
                self.handle_credentials_key(key, false);
                false
            }
            Screen::Admin => {
                self.handle_admin_key(key);
                false
            }
        }
    }

    fn handle_scanner_key(&mut self, key: KeyEvent) -> bool {
        match self.focus {
            Focus::FilePath => match key.code {
                KeyCode::Esc => self.focus = Focus::None,
                KeyCode::Enter => {
                    self.focus = Focus::None;
                    self.trigger_scan();
                }
                KeyCode::Backspace => {
                    self.file_input.pop();
                }
                KeyCode::Char(c) => self.file_input.push(c),
                _ => {}
            },
            Focus::CreditAmount => match key.code {
                KeyCode::Esc => self.focus = Focus::None,
                KeyCode::Enter => {
                    self.focus = Focus::None;
                    self.submit_credit_request();
                }
                KeyCode::Backspace => {
                    self.credit_input.pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.credit_input.push(c);
                }
                _ => {}
            },
            Focus::None => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('e') => self.focus = Focus::FilePath,
                KeyCode::Char('c') => self.focus = Focus::CreditAmount,
                KeyCode::Char('s') | KeyCode::Enter => self.trigger_scan(),
                KeyCode::Char('m') => self.trigger_matches(),
                KeyCode::Char('l') => self.primary_auth_action(),
                KeyCode::Char('r') => {
                    self.register_form = CredentialsForm::default();
                    self.screen = Screen::Register;
                }
                KeyCode::Char('a') => self.enter_admin(),
                _ => {}
            },
        }
        false
    }

    fn handle_credentials_key(&mut self, key: KeyEvent, login: bool) {
        let form = if login {
            &mut self.login_form
        } else {
            &mut self.register_form
        };
        match key.code {
            KeyCode::Esc => self.screen = Screen::Scanner,
            KeyCode::Tab => form.focus_password = !form.focus_password,
            KeyCode::Enter => {
                if login {
                    self.submit_login();
                } else {
                    self.submit_register();
                }
            }
            KeyCode::Backspace => {
                form.active_field().pop();
            }
            KeyCode::Char(c) => form.active_field().push(c),
            _ => {}
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Scanner,
            KeyCode::Down | KeyCode::Char('j') => self.admin.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.admin.select_prev(),
            KeyCode::Char('y') => self.decide_selected(true),
            KeyCode::Char('n') => self.decide_selected(false),
            KeyCode::Char('g') => {
                self.admin = AdminState::loading();
                self.load_pending();
                self.load_analytics();
            }
            _ => {}
        }
    }
}

/// Set up the terminal, run the loop, restore the terminal.
pub fn run(client: ApiClient, handle: Handle) -> Result<()> {
    let mut source = event_source_from_env()?;
    let scripted = source.is_scripted();

    let mut stdout = io::stdout();
    if !scripted {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, handle);
    app.refresh_session();
    let result = run_app(&mut terminal, &mut app, &mut *source);

    if !scripted {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    source: &mut dyn EventSource,
) -> Result<()> {
    loop {
        while let Some(event) = app.try_recv() {
            app.apply(event);
        }

        terminal.draw(|f| ui::render(f, app))?;

        match source.next(Duration::from_millis(150))? {
            Some(Event::Key(key)) => {
                if app.handle_key(key) {
                    return Ok(());
                }
            }
            Some(Event::Resize(_, _)) => {
                // redrawn on next loop automatically
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_client::reqwest::StatusCode;
    use docmatch_model::{DocumentId, Role, ScanResults};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn test_app() -> (tokio::runtime::Runtime, App) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        // Unroutable: tests never rely on a live backend.
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        let app = App::new(client, runtime.handle().clone());
        (runtime, app)
    }

    fn alice() -> UserProfile {
        UserProfile {
            username: "alice".into(),
            credits: 5,
            role: Role::Admin,
        }
    }

    fn report(best_match: &str) -> ScanReport {
        ScanReport {
            document_id: DocumentId(17),
            filename: "notes.txt".into(),
            filepath: "uploads/notes.txt".into(),
            scan_results: ScanResults {
                document_type: "Text Document".into(),
                content_snippet: "quarterly report...".into(),
                processing_status: "Similarity Matched (Word Overlap)".into(),
                best_match_document_id: best_match.into(),
                best_match_similarity_score: 42.5,
            },
        }
    }

    #[test]
    fn anonymous_primary_action_opens_login_without_touching_the_session() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::Profile(Ok(None)));
        assert_eq!(app.session, SessionState::Anonymous);

        app.handle_key(key('l'));
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.session, SessionState::Anonymous);
    }

    #[test]
    fn authenticated_profile_arms_logout() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::Profile(Ok(Some(alice()))));
        assert_eq!(app.session.primary_action(), AuthAction::Logout);

        let lines =
            crate::view::profile_lines(app.session.profile().unwrap())
                .join("\n");
        assert!(lines.contains("alice"));
        assert!(lines.contains("5"));
        assert!(lines.contains("admin"));
    }

    #[test]
    fn empty_file_input_is_a_local_validation_error() {
        let (_rt, mut app) = test_app();
        app.handle_key(key('s'));
        assert_eq!(app.scan, ScanPhase::Idle);
        assert_eq!(
            app.status,
            StatusLine::error("Please select a document to upload.")
        );
    }

    #[test]
    fn scan_500_shows_the_status_code_and_hides_results() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::ScanDone(Err(ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        })));
        assert!(app.status.text.contains("500"));
        assert!(!app.scan.results_visible());
    }

    #[test]
    fn unauthorized_scan_redirects_to_the_login_screen() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::ScanDone(Err(ApiError::Unauthorized {
            message: "Session expired".into(),
        })));
        assert_eq!(app.screen, Screen::Login);
        assert!(app.status.text.contains("Session expired"));
    }

    #[test]
    fn match_trigger_is_inert_for_sentinel_reports() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::ScanDone(Ok(report(
            docmatch_model::NO_MATCH_SENTINEL,
        ))));
        app.handle_key(key('m'));
        assert_eq!(app.matches, MatchPanel::Hidden);
    }

    #[test]
    fn match_trigger_fetches_for_matching_reports() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::ScanDone(Ok(report("3"))));
        app.handle_key(key('m'));
        assert_eq!(app.matches, MatchPanel::Loading);
    }

    #[test]
    fn logout_discards_scan_state() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::ScanDone(Ok(report("3"))));
        app.apply(AppEvent::LogoutDone(Ok(())));
        assert_eq!(app.session, SessionState::Anonymous);
        assert_eq!(app.scan, ScanPhase::Idle);
        assert_eq!(app.matches, MatchPanel::Hidden);
    }

    #[test]
    fn credit_acknowledgement_is_shown_in_the_success_tone() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::CreditDone(Ok(Acknowledgement {
            message: "Request received".into(),
        })));
        assert_eq!(app.status, StatusLine::success("Request received"));
    }

    #[test]
    fn network_failure_on_credits_uses_the_failure_tone() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::CreditDone(Err(ApiError::Validation(
            "invalid credit amount: 0".into(),
        ))));
        assert_eq!(app.status.tone, crate::state::Tone::Error);
    }

    #[test]
    fn non_admins_cannot_open_the_admin_screen() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::Profile(Ok(Some(UserProfile {
            username: "bob".into(),
            credits: 3,
            role: Role::User,
        }))));
        app.handle_key(key('a'));
        assert_eq!(app.screen, Screen::Scanner);
    }

    #[test]
    fn admin_section_failures_are_independent() {
        let (_rt, mut app) = test_app();
        app.apply(AppEvent::PendingLoaded(Err(ApiError::Http {
            status: StatusCode::BAD_GATEWAY,
        })));
        app.apply(AppEvent::AnalyticsLoaded(Ok(
            sample_analytics(),
        )));
        assert!(matches!(app.admin.pending, SectionState::Failed(_)));
        assert!(app.admin.analytics.loaded().is_some());
    }

    fn sample_analytics() -> AnalyticsReport {
        AnalyticsReport {
            scans_per_user: vec![],
            common_topics: vec![],
            top_users: vec![],
            credit_stats: docmatch_model::CreditStats {
                total_credits_used: 0,
                avg_credits_used: 0.0,
                approved_credits: 0,
                pending_credits: 0,
            },
        }
    }
}
