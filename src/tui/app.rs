//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service calls via background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::client::{RecommendationApi, RecommendationClient};
use crate::config::ClientConfig;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    results::{render_results, ResultsState},
};
use super::worker::{RecommendationProgress, RecommendationWorker, ServiceProbe, WorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Results,
}

/// Main application state
pub struct App<A: RecommendationApi + 'static = RecommendationClient> {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Service client shared with worker threads
    api: Arc<A>,

    dashboard_state: DashboardState,
    patient_form_state: PatientFormState,
    results_state: ResultsState,

    /// Pending recommendation request (if running)
    pending_request: Option<WorkerHandle<RecommendationProgress>>,

    /// Pending status probe (if running)
    pending_probe: Option<WorkerHandle<ServiceProbe>>,

    /// `top_n` of the request in flight
    last_requested_top_n: i64,
}

impl App<RecommendationClient> {
    /// Create a new application talking to `config.api_url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = RecommendationClient::new(config)?;
        Ok(Self::with_client(Arc::new(client), config.api_url.clone()))
    }
}

impl<A: RecommendationApi + 'static> App<A> {
    /// Create application with an injected client (Composition Root pattern).
    pub fn with_client(api: Arc<A>, api_url: String) -> Self {
        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            api,
            dashboard_state: DashboardState {
                api_url,
                ..DashboardState::default()
            },
            patient_form_state: PatientFormState::default(),
            results_state: ResultsState::default(),
            pending_request: None,
            pending_probe: None,
            last_requested_top_n: 0,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.refresh_status();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_workers();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::PatientForm => {
                        render_patient_form(f, chunks[0], &self.patient_form_state)
                    }
                    Screen::Results => render_results(f, chunks[0], &self.results_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain messages from background workers.
    pub fn poll_workers(&mut self) {
        loop {
            let Some(progress) = self
                .pending_request
                .as_ref()
                .and_then(WorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                RecommendationProgress::Sending => {
                    self.results_state = ResultsState::Sending;
                }
                RecommendationProgress::Complete(doctors) => {
                    self.dashboard_state.last_result_count = Some(doctors.len());
                    self.results_state = ResultsState::Complete {
                        doctors,
                        requested: self.last_requested_top_n,
                    };
                    self.pending_request = None;
                }
                RecommendationProgress::Error(message) => {
                    self.results_state = ResultsState::Error { message };
                    self.pending_request = None;
                }
            }
        }

        let probe = self.pending_probe.as_ref().and_then(WorkerHandle::try_recv);
        if let Some(probe) = probe {
            self.dashboard_state.liveness = Some(probe.liveness);
            self.dashboard_state.health = Some(probe.health);
            self.dashboard_state.probing = false;
            self.pending_probe = None;
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.patient_form_state = PatientFormState::default();
                self.screen = Screen::PatientForm;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh_status(),
            KeyCode::Char('v') | KeyCode::Char('V') => {
                if self.dashboard_state.last_result_count.is_some() {
                    self.screen = Screen::Results;
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.patient_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.patient_form_state.next_field();
            }
            KeyCode::Left => self.patient_form_state.adjust(-1),
            KeyCode::Right => self.patient_form_state.adjust(1),
            KeyCode::F(2) => {
                self.patient_form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.patient_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.patient_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.patient_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_patient_form();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match &self.results_state {
            ResultsState::Sending => {}
            ResultsState::Error { .. } => match key {
                KeyCode::Enter => {
                    self.patient_form_state = PatientFormState::default();
                    self.screen = Screen::PatientForm;
                }
                KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            _ => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.patient_form_state = PatientFormState::default();
                    self.screen = Screen::PatientForm;
                }
                _ => {}
            },
        }
    }

    fn submit_patient_form(&mut self) {
        if self.pending_request.is_some() {
            return;
        }

        match self.patient_form_state.to_request() {
            Ok(request) => {
                tracing::info!(top_n = request.top_n, "Submitting recommendation request");

                self.last_requested_top_n = request.top_n;
                self.screen = Screen::Results;
                self.results_state = ResultsState::Sending;
                self.pending_request = Some(RecommendationWorker::spawn(self.api.clone(), request));

                // Clear plaintext buffers from the UI immediately.
                self.patient_form_state.clear_sensitive();
            }
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
            }
        }
    }

    fn refresh_status(&mut self) {
        if self.pending_probe.is_some() {
            return;
        }
        self.dashboard_state.probing = true;
        self.pending_probe = Some(RecommendationWorker::probe(self.api.clone()));
    }
}
