//! Main TUI application state machine.
//!
//! Handles:
//! - Warm-up artifact loading (the composition root)
//! - Screen navigation and input events
//! - Async assessment via the background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{artifact, remote};
use crate::application::RecommendationService;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    intake::{render_intake_form, IntakeFormState},
    render_disclaimer,
    results::{render_results, ResultsState, WorkStage},
};
use super::worker::{AssessmentProgress, AssessmentWorker, AssessmentWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Intake,
    Results,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Recommendation service; artifacts are loaded once and immutable, so
    /// the service is shared read-only with the worker thread.
    service: Arc<RecommendationService>,

    /// Dashboard state
    dashboard_state: DashboardState,

    /// Intake form state
    intake_state: IntakeFormState,

    /// Results state
    results_state: ResultsState,

    /// Pending assessment worker (if running)
    pending_worker: Option<AssessmentWorkerHandle>,
}

impl App {
    /// Create a new application instance, loading all model artifacts.
    ///
    /// Warm-up is all-or-nothing: a missing or corrupt artifact, or a failed
    /// remote fetch, refuses to start the application.
    ///
    /// # Errors
    /// Returns error naming the artifact that failed to load.
    pub fn new() -> Result<Self> {
        let model_dir = std::env::var("FLEXION_MODEL_DIR").unwrap_or_else(|_| "models".to_string());
        let model_dir = std::path::Path::new(&model_dir);

        if !model_dir.exists() {
            anyhow::bail!(
                "Model path not found at {:?}. Set FLEXION_MODEL_DIR to a directory containing the model artifacts.",
                model_dir
            );
        }

        let classifier = artifact::load_classifier_artifacts(model_dir)
            .with_context(|| format!("Failed to load classifier artifacts from {model_dir:?}"))?;

        let regression = artifact::load_regression_artifacts(model_dir)
            .with_context(|| format!("Failed to load regression artifacts from {model_dir:?}"))?;

        let exercise_model_url = std::env::var("FLEXION_EXERCISE_MODEL_URL")
            .unwrap_or_else(|_| remote::DEFAULT_EXERCISE_MODEL_URL.to_string());
        let exercise_model = remote::fetch_exercise_classifier(&exercise_model_url)
            .context("Failed to fetch the exercise classifier")?;

        let service = RecommendationService::from_artifacts(classifier, exercise_model, regression)
            .context("Failed to wire the recommendation service")?;

        Self::with_service(Arc::new(service), exercise_model_url)
    }

    /// Create the application with an injected service (Composition Root
    /// pattern), for tests and alternative wiring.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for parity with `new()`.
    pub fn with_service(
        service: Arc<RecommendationService>,
        exercise_model_source: String,
    ) -> Result<Self> {
        let dashboard_state = DashboardState {
            models_loaded: true,
            exercise_model_source,
            outcome_enabled: service.outcome_enabled(),
            session_assessments: 0,
        };

        Ok(Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            dashboard_state,
            intake_state: IntakeFormState::default(),
            results_state: ResultsState::default(),
            pending_worker: None,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::Intake => render_intake_form(f, content_area, &self.intake_state),
                    Screen::Results => render_results(f, content_area, &self.results_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }

        loop {
            let progress = match self
                .pending_worker
                .as_ref()
                .and_then(AssessmentWorkerHandle::try_recv)
            {
                Some(p) => p,
                None => break,
            };

            match progress {
                AssessmentProgress::Encoding => {
                    self.results_state = ResultsState::Working {
                        stage: WorkStage::Encoding,
                    };
                }
                AssessmentProgress::Classifying => {
                    self.results_state = ResultsState::Working {
                        stage: WorkStage::Classifying,
                    };
                }
                AssessmentProgress::Estimating => {
                    self.results_state = ResultsState::Working {
                        stage: WorkStage::Estimating,
                    };
                }
                AssessmentProgress::Complete(report) => {
                    self.results_state = ResultsState::Complete { report };
                    self.pending_worker = None;
                    self.dashboard_state.session_assessments += 1;
                    break;
                }
                AssessmentProgress::Error(message) => {
                    self.results_state = ResultsState::Error { message };
                    self.pending_worker = None;
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Intake => self.handle_intake_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.intake_state = IntakeFormState::default();
                self.screen = Screen::Intake;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.screen = Screen::Results;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_intake_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => {
                self.intake_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.intake_state.next_field();
            }
            KeyCode::Left => {
                self.intake_state.cycle(false);
            }
            KeyCode::Right => {
                self.intake_state.cycle(true);
            }
            KeyCode::Char(' ') => {
                self.intake_state.toggle_symptom();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.intake_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.intake_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.intake_state.delete_char();
            }
            KeyCode::Delete => {
                self.intake_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_intake_form();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match &self.results_state {
            ResultsState::Complete { .. } | ResultsState::Idle => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.intake_state = IntakeFormState::default();
                    self.screen = Screen::Intake;
                }
                _ => {}
            },
            ResultsState::Error { .. } => match key {
                KeyCode::Enter => {
                    self.screen = Screen::Intake;
                }
                KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            ResultsState::Working { .. } => {}
        }
    }

    fn submit_intake_form(&mut self) {
        let profile = match self.intake_state.to_profile() {
            Ok(profile) => profile,
            Err(e) => {
                self.intake_state.error_message = Some(e);
                return;
            }
        };

        if let Err(errors) = profile.validate() {
            self.intake_state.error_message = Some(errors.join(", "));
            return;
        }

        // The age gate rejects the request before any model work; it is a
        // form-level message, not a results-screen failure.
        if let Err(message) = profile.eligibility() {
            self.intake_state.error_message = Some(message);
            return;
        }

        self.screen = Screen::Results;
        self.results_state = ResultsState::Working {
            stage: WorkStage::Encoding,
        };

        let worker = AssessmentWorker::spawn(self.service.clone(), profile);
        self.pending_worker = Some(worker);
    }
}
