use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use keydrill_core::model::LeaderboardEntry;
use keydrill_core::session::{Epoch, KeyOutcome, PendingStep, Phase, QuizSession, StepKind};
use keydrill_core::time::Clock;
use services::{QuizService, StoreUpdate, Tagged};

use crate::input::chord_from_key_event;

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Name,
    Password,
}

/// The login form as typed so far.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub name: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

/// Transient feedback shown during the active phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Correct { points: u32 },
    TryAgain,
    Reveal { answer: String },
}

/// A delayed transition waiting for its deadline.
///
/// The step inside carries the epoch it was issued for; the session drops
/// it on apply if a reset happened in between.
#[derive(Debug, Clone, Copy)]
struct ScheduledStep {
    due: Instant,
    step: PendingStep,
}

/// Top-level UI state: the quiz session plus everything the screens render
/// around it.
///
/// One logical event is processed to completion per call; store results
/// arrive over a channel and are drained on [`tick`](Self::tick), where
/// stale epochs are discarded.
pub struct UiApp {
    service: Arc<QuizService>,
    session: QuizSession,
    clock: Clock,
    handle: Handle,
    updates_tx: mpsc::UnboundedSender<Tagged<StoreUpdate>>,
    updates_rx: mpsc::UnboundedReceiver<Tagged<StoreUpdate>>,
    pub login: LoginForm,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub ranking: Option<usize>,
    pub improvement: Option<i64>,
    pub notice: Option<Notice>,
    scheduled: Option<ScheduledStep>,
    finished_epoch: Option<Epoch>,
    should_quit: bool,
}

impl UiApp {
    #[must_use]
    pub fn new(service: Arc<QuizService>, handle: Handle) -> Self {
        let session = service.new_session();
        let clock = service.clock();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            service,
            session,
            clock,
            handle,
            updates_tx,
            updates_rx,
            login: LoginForm::default(),
            leaderboard: Vec::new(),
            ranking: None,
            improvement: None,
            notice: None,
            scheduled: None,
            finished_epoch: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Routes a terminal key event to the current phase.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if event.kind != KeyEventKind::Press {
            return;
        }
        // F10 quits from anywhere; it is outside the combo space.
        if event.code == KeyCode::F(10) {
            self.quit();
            return;
        }
        match self.session.phase() {
            Phase::Login => self.handle_login_key(event),
            Phase::Intro => {
                if event.code == KeyCode::Enter {
                    self.start();
                }
            }
            Phase::Active => {
                if event.code == KeyCode::Esc && event.modifiers.is_empty() {
                    self.restart();
                } else if let Some(chord) = chord_from_key_event(event) {
                    let outcome = self.session.submit_key(&chord, self.clock.now());
                    self.apply_outcome(outcome);
                }
            }
            Phase::Summary => {
                if event.code == KeyCode::Enter {
                    self.restart();
                }
            }
        }
    }

    /// Advances deadlines and drains asynchronous store results.
    pub fn tick(&mut self) {
        self.process_scheduled(Instant::now());
        self.drain_updates();
    }

    fn handle_login_key(&mut self, event: &KeyEvent) {
        match event.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.focus = match self.login.focus {
                    LoginField::Name => LoginField::Password,
                    LoginField::Password => LoginField::Name,
                };
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            KeyCode::Char(c)
                if !event.modifiers.contains(KeyModifiers::CONTROL)
                    && !event.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.field_mut().push(c);
            }
            _ => {}
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.login.focus {
            LoginField::Name => &mut self.login.name,
            LoginField::Password => &mut self.login.password,
        }
    }

    fn submit_login(&mut self) {
        let name = self.login.name.clone();
        let password = self.login.password.clone();
        match self.service.login(&mut self.session, &name, &password) {
            Ok(()) => {
                self.login.error = None;
                self.login.password.clear();
                // Entering the intro triggers a ranked-query refresh.
                self.spawn_refresh();
            }
            Err(err) => {
                self.login.error = Some(err.to_string());
                if matches!(err, keydrill_core::session::AuthError::EmptyName) {
                    self.login.focus = LoginField::Name;
                }
            }
        }
    }

    fn start(&mut self) {
        self.notice = None;
        self.session.start(self.clock.now());
    }

    fn restart(&mut self) {
        self.session.reset();
        self.scheduled = None;
        self.notice = None;
        self.ranking = None;
        self.improvement = None;
        self.finished_epoch = None;
        self.spawn_refresh();
    }

    fn apply_outcome(&mut self, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Matched { points, step, .. } => {
                self.notice = Some(Notice::Correct { points });
                self.schedule(step);
            }
            KeyOutcome::Retry { step } => {
                self.notice = Some(Notice::TryAgain);
                self.schedule(step);
            }
            KeyOutcome::Revealed { answer, step } => {
                self.notice = Some(Notice::Reveal { answer });
                self.schedule(step);
            }
        }
    }

    fn schedule(&mut self, step: PendingStep) {
        self.scheduled = Some(ScheduledStep {
            due: Instant::now() + Duration::from_millis(step.delay_ms),
            step,
        });
    }

    fn process_scheduled(&mut self, now: Instant) {
        let Some(scheduled) = self.scheduled else {
            return;
        };
        if now < scheduled.due {
            return;
        }
        self.scheduled = None;
        self.session.apply(scheduled.step, self.clock.now());
        if scheduled.step.kind == StepKind::Advance {
            self.notice = None;
        }
        if self.session.phase() == Phase::Summary {
            self.spawn_finish();
        }
    }

    fn drain_updates(&mut self) {
        while let Ok(tagged) = self.updates_rx.try_recv() {
            if !tagged.is_current(self.session.epoch()) {
                debug!(
                    stale = %tagged.epoch,
                    current = %self.session.epoch(),
                    "discarding stale store update"
                );
                continue;
            }
            match tagged.value {
                StoreUpdate::Leaderboard(entries) => {
                    self.leaderboard = entries;
                }
                StoreUpdate::Finished(outcome) => {
                    if !outcome.leaderboard.is_empty() {
                        self.leaderboard = outcome.leaderboard;
                    }
                    self.ranking = outcome.ranking;
                    self.improvement = outcome.improvement;
                }
            }
        }
    }

    fn spawn_refresh(&self) {
        let service = Arc::clone(&self.service);
        let tx = self.updates_tx.clone();
        let epoch = self.session.epoch();
        self.handle.spawn(async move {
            if let Some(tagged) = service.refresh_leaderboard(epoch).await {
                let _ = tx.send(tagged);
            }
        });
    }

    fn spawn_finish(&mut self) {
        let epoch = self.session.epoch();
        // A summary is persisted at most once per attempt.
        if self.finished_epoch == Some(epoch) {
            return;
        }
        let Some(owner) = self.session.owner().map(str::to_string) else {
            return;
        };
        self.finished_epoch = Some(epoch);
        let service = Arc::clone(&self.service);
        let tx = self.updates_tx.clone();
        let score = self.session.score();
        let details = self.session.records().to_vec();
        self.handle.spawn(async move {
            let tagged = service.finish(epoch, &owner, score, details).await;
            let _ = tx.send(tagged);
        });
    }
}
