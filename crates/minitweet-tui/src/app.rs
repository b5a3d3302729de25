//! Application state management for the minitweet terminal client.
//!
//! This module contains the `App` struct that wires the core components
//! together: it owns the session store, feed, and composer, holds the form
//! state for login/signup, and runs network calls on background tasks whose
//! results come back over an MPSC channel.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use minitweet_core::api::{ApiClient, ApiError, Reply};
use minitweet_core::auth::{self, AuthError, FileStorage, KeyringStorage, MemoryStorage};
use minitweet_core::config::{Config, StorageBackend};
use minitweet_core::feed::{FeedResponse, FeedUpdate};
use minitweet_core::{
    ComposeError, Credential, FeedSynchronizer, LoginForm, PostComposer, SessionState,
    SessionStore, SignupForm,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for username input (server column is VARCHAR(30))
const MAX_USERNAME_LENGTH: usize = 30;

/// Maximum length for email input (server column is VARCHAR(255))
const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Environment variable pre-filling the login email
const EMAIL_ENV: &str = "MINITWEET_EMAIL";

const CONNECTION_ERROR: &str = "Unable to connect to server. Check that it is running.";

// ============================================================================
// UI State Types
// ============================================================================

/// Navigation mode. Reset to `Feed` whenever a credential is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    Login,
    Signup,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Signup form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    Username,
    Email,
    Password,
    Button,
}

impl SignupFocus {
    pub fn next(&self) -> Self {
        match self {
            SignupFocus::Username => SignupFocus::Email,
            SignupFocus::Email => SignupFocus::Password,
            SignupFocus::Password => SignupFocus::Button,
            SignupFocus::Button => SignupFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignupFocus::Username => SignupFocus::Button,
            SignupFocus::Email => SignupFocus::Username,
            SignupFocus::Password => SignupFocus::Email,
            SignupFocus::Button => SignupFocus::Password,
        }
    }
}

/// Startup switches parsed from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupOptions {
    /// Keep the credential in memory only
    pub ephemeral: bool,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background network tasks back to the main loop.
enum TaskResult {
    /// Login finished (credential or reason)
    Login(Result<Credential, AuthError>),
    /// Signup-then-login finished
    Signup(Result<Credential, AuthError>),
    /// Post submission reply
    Posted(Result<Reply, ApiError>),
    /// Feed fetch reply, applied through the session generation guard
    Feed(Result<FeedResponse, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    /// Where config changes are saved; `None` keeps them in memory
    config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub session: SessionStore,
    pub feed: FeedSynchronizer,
    pub composer: PostComposer,

    // UI State
    pub state: AppState,
    pub view: View,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Signup form state
    pub signup_username: String,
    pub signup_email: String,
    pub signup_password: String,
    pub signup_focus: SignupFocus,
    pub signup_error: Option<String>,

    // Compose box state
    pub compose_error: Option<String>,

    /// Lines scrolled past at the top of the feed panel
    pub feed_scroll: u16,

    // In-flight work
    pub auth_in_flight: bool,
    pub post_in_flight: bool,
    pub feed_in_flight: usize,

    pub last_refreshed: Option<DateTime<Local>>,
    pub status_message: Option<String>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Session change notifications
    session_rx: watch::Receiver<SessionState>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new(options: StartupOptions) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, storage = ?config.storage, "Cache directory configured");

        let session = Self::open_session(&config, cache_dir, options);
        let api = ApiClient::new(&config.api_url())?;
        info!(api_url = api.base_url(), authenticated = session.is_authenticated(), "Client configured");

        let app = Self::with_parts(config, api, session);
        Ok(match Config::config_path() {
            Ok(path) => app.with_config_path(path),
            Err(e) => {
                warn!(error = %e, "No config directory, settings will not be saved");
                app
            }
        })
    }

    fn open_session(config: &Config, cache_dir: PathBuf, options: StartupOptions) -> SessionStore {
        if options.ephemeral {
            return SessionStore::open(MemoryStorage::new());
        }
        match config.storage {
            StorageBackend::File => SessionStore::open(FileStorage::new(cache_dir)),
            StorageBackend::Keyring => match KeyringStorage::new() {
                Ok(storage) => SessionStore::open(storage),
                Err(e) => {
                    warn!(error = %e, "Keychain unavailable, falling back to session file");
                    SessionStore::open(FileStorage::new(cache_dir))
                }
            },
        }
    }

    /// Assemble an app from already-built services
    pub fn with_parts(config: Config, api: ApiClient, session: SessionStore) -> Self {
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        // A fresh receiver treats the current state as already seen
        let session_rx = session.subscribe();

        let login_email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Self {
            config,
            config_path: None,
            api,
            session,
            feed: FeedSynchronizer::new(),
            composer: PostComposer::new(),

            state: AppState::Normal,
            view: View::Feed,

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            signup_username: String::new(),
            signup_email: String::new(),
            signup_password: String::new(),
            signup_focus: SignupFocus::Username,
            signup_error: None,

            compose_error: None,
            feed_scroll: 0,

            auth_in_flight: false,
            post_in_flight: false,
            feed_in_flight: 0,

            last_refreshed: None,
            status_message: None,

            task_rx,
            task_tx,
            session_rx,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn show_feed(&mut self) {
        self.view = View::Feed;
    }

    pub fn start_login(&mut self) {
        self.view = View::Login;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    pub fn start_signup(&mut self) {
        self.view = View::Signup;
        self.signup_focus = SignupFocus::Username;
        self.signup_error = None;
    }

    pub fn scroll_feed_down(&mut self, lines: u16) {
        self.feed_scroll = self.feed_scroll.saturating_add(lines);
    }

    pub fn scroll_feed_up(&mut self, lines: u16) {
        self.feed_scroll = self.feed_scroll.saturating_sub(lines);
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Interactive login on a plain terminal (used by `--login`)
    pub async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== minitweet login ===\n");

        let email = if self.login_email.is_empty() {
            Self::prompt("Email: ")?
        } else {
            let input = Self::prompt(&format!("Email [{}]: ", self.login_email))?;
            if input.is_empty() {
                self.login_email.clone()
            } else {
                input
            }
        };
        let password = rpassword::prompt_password("Password: ")?;

        println!("\nAuthenticating...");
        let form = LoginForm::new(email.clone(), password);
        auth::login(&self.api, &mut self.session, &form).await?;

        self.remember_email(email);
        println!("Login successful!\n");
        Ok(())
    }

    fn prompt(label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    /// Submit the login form in the background
    pub fn submit_login(&mut self) {
        if self.auth_in_flight {
            return;
        }
        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;
        self.auth_in_flight = true;

        let form = LoginForm::new(self.login_email.clone(), self.login_password.clone());
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = auth::request_login(&api, &form).await;
            Self::send_result(&tx, TaskResult::Login(result)).await;
        });
    }

    /// Submit the signup form in the background
    pub fn submit_signup(&mut self) {
        if self.auth_in_flight {
            return;
        }
        if self.signup_username.is_empty()
            || self.signup_email.is_empty()
            || self.signup_password.is_empty()
        {
            self.signup_error = Some("Username, email and password required".to_string());
            return;
        }

        self.signup_error = None;
        self.auth_in_flight = true;

        let form = SignupForm::new(
            self.signup_username.clone(),
            self.signup_email.clone(),
            self.signup_password.clone(),
        );
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = auth::request_signup(&api, &form).await;
            Self::send_result(&tx, TaskResult::Signup(result)).await;
        });
    }

    pub fn logout(&mut self) {
        match self.session.clear() {
            Ok(()) => info!("Logged out"),
            Err(e) => {
                error!(error = %e, "Failed to clear session");
                self.status_message = Some(format!("Logout failed: {}", e));
            }
        }
    }

    /// Persist config changes to `path`
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    fn remember_email(&mut self, email: String) {
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.config.last_email = Some(email);
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, ?path, "Failed to save config");
        }
    }

    fn accept_credential(&mut self, credential: Credential) -> Result<(), String> {
        self.session
            .set_credential(credential)
            .map_err(|e| {
                error!(error = %e, "Failed to save session");
                format!("Failed to save session: {}", e)
            })
    }

    // =========================================================================
    // Posting and feed
    // =========================================================================

    /// Submit the compose box in the background. Blank drafts never leave
    /// the client.
    pub fn submit_post(&mut self) {
        if self.post_in_flight || !self.is_authenticated() {
            return;
        }
        if self.composer.is_blank() {
            self.compose_error = Some("Write something first".to_string());
            return;
        }

        self.compose_error = None;
        self.post_in_flight = true;

        let request = self.composer.begin(&self.session);
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = request.send(&api).await;
            Self::send_result(&tx, TaskResult::Posted(result)).await;
        });
    }

    /// Start a feed fetch in the background
    pub fn request_feed(&mut self) {
        self.feed_in_flight += 1;

        let request = self.feed.begin(&self.session);
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = request.send(&api).await;
            Self::send_result(&tx, TaskResult::Feed(result)).await;
        });
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            error!("Failed to send task result - channel closed");
        }
    }

    /// Drain completed background tasks and session notifications
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
            self.check_session_changes();
        }
        self.check_session_changes();
    }

    fn check_session_changes(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            let state = *self.session_rx.borrow_and_update();
            self.on_session_change(state);
        }
    }

    fn on_session_change(&mut self, state: SessionState) {
        debug!(?state, "Session changed");
        match state {
            SessionState::Authenticated => {
                self.view = View::Feed;
                self.login_password.clear();
                self.signup_password.clear();
                self.request_feed();
            }
            SessionState::Anonymous => {
                self.view = View::Feed;
                self.feed.clear();
                self.composer.set_draft("");
                self.compose_error = None;
                self.last_refreshed = None;
                self.feed_scroll = 0;
            }
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Login(result) => {
                self.auth_in_flight = false;
                match result {
                    Ok(credential) => {
                        if let Err(msg) = self.accept_credential(credential) {
                            self.login_error = Some(msg);
                            return;
                        }
                        self.remember_email(self.login_email.clone());
                    }
                    Err(e) => self.login_error = Some(Self::auth_message(&e)),
                }
            }
            TaskResult::Signup(result) => {
                self.auth_in_flight = false;
                match result {
                    Ok(credential) => {
                        if let Err(msg) = self.accept_credential(credential) {
                            self.signup_error = Some(msg);
                            return;
                        }
                        self.remember_email(self.signup_email.clone());
                        self.signup_username.clear();
                    }
                    Err(AuthError::AccountCreatedLoginFailed) => {
                        // The account exists; hand over to the login form
                        self.login_email = self.signup_email.clone();
                        self.login_password.clear();
                        self.signup_password.clear();
                        self.start_login();
                        self.login_error = Some(AuthError::AccountCreatedLoginFailed.to_string());
                    }
                    Err(e) => self.signup_error = Some(Self::auth_message(&e)),
                }
            }
            TaskResult::Posted(result) => {
                self.post_in_flight = false;
                match result {
                    Ok(reply) => match self.composer.finish(reply) {
                        Ok(()) => {
                            self.compose_error = None;
                            self.request_feed();
                        }
                        Err(e) => self.compose_error = Some(e.to_string()),
                    },
                    Err(e) => {
                        warn!(error = %e, "Post request failed");
                        self.compose_error = Some(Self::compose_message(&ComposeError::Transport(e)));
                    }
                }
            }
            TaskResult::Feed(result) => {
                self.feed_in_flight = self.feed_in_flight.saturating_sub(1);
                match result {
                    Ok(response) => {
                        if let FeedUpdate::Replaced(_) = self.feed.apply(response, &self.session) {
                            self.last_refreshed = Some(Local::now());
                            self.feed_scroll = 0;
                        }
                    }
                    // Feed failures stay invisible; the feed simply does not change
                    Err(e) => warn!(error = %e, "Feed request failed"),
                }
            }
        }
    }

    fn auth_message(e: &AuthError) -> String {
        match e {
            AuthError::Transport(_) => CONNECTION_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    fn compose_message(e: &ComposeError) -> String {
        match e {
            ComposeError::Transport(_) => CONNECTION_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_post_char(c: char) -> bool {
    is_valid_input_char(c) || c == '\n'
}

// ============================================================================
// Tests
// ============================================================================
