//! Dashboard application state and key handling.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use heirloom_abstraction::{IndexerClient, WalletProvider};
use heirloom_core::{
    AutoExecuteCountdown, ContractSession, LedgerState, SessionStatus, TickOutcome,
};

use crate::session_task::{SessionCommand, SessionEvent};

/// Maximum notices kept in the activity log.
const MAX_NOTICES: usize = 50;

/// Drives the one-shot auto-execute countdown off observed session state.
///
/// Each false-to-true transition of `is_registered` mints a new registration
/// token; the countdown consumes a token permanently when it arms, so neither
/// re-renders nor a cancelled countdown can restart it for the same
/// registration event.
#[derive(Debug, Default)]
pub struct CountdownDriver {
    countdown: AutoExecuteCountdown,
    registration_epoch: u64,
    was_registered: bool,
}

impl CountdownDriver {
    /// Feed the latest observed status and snapshot; arms when a registered,
    /// not-yet-executed contract is seen on a connected session.
    pub fn observe(&mut self, status: SessionStatus, ledger: Option<&LedgerState>) {
        let is_registered = ledger.is_some_and(|l| l.is_registered);
        if is_registered && !self.was_registered {
            self.registration_epoch += 1;
        }
        self.was_registered = is_registered;

        let armable = status == SessionStatus::Connected
            && ledger.is_some_and(|l| l.is_registered && !l.is_executed);
        if armable {
            self.countdown.arm(self.registration_epoch);
        }
    }

    /// Advance one tick; true means execute must be triggered now.
    pub fn tick(&mut self) -> bool {
        self.countdown.tick() == TickOutcome::Fire
    }

    /// Cancel a running countdown. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.countdown.cancel()
    }

    /// Ticks remaining, while counting.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }
}

/// Which register-form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Parent,
    Child,
}

/// State of the register dialog.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub parent: Input,
    pub child: Input,
    pub focus: Option<FormFocus>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self { parent: Input::default(), child: Input::default(), focus: Some(FormFocus::Parent) }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Some(FormFocus::Parent) => Some(FormFocus::Child),
            _ => Some(FormFocus::Parent),
        };
    }
}

/// Input mode of the dashboard.
#[derive(Debug, Default)]
pub enum InputMode {
    /// Keys drive the dashboard directly.
    #[default]
    Normal,
    /// The register dialog captures keystrokes.
    Register(RegisterForm),
}

/// Main dashboard application.
pub struct App<W, I> {
    /// Shared session handle; the worker task issues all operations.
    pub session: Arc<ContractSession<W, I>>,
    commands: UnboundedSender<SessionCommand>,
    events: UnboundedReceiver<SessionEvent>,
    /// Auto-execute countdown, advanced once per second by the main loop.
    pub countdown: CountdownDriver,
    /// Current input mode.
    pub mode: InputMode,
    /// Most recent activity notices, newest last.
    pub notices: Vec<String>,
    /// Operation the user is waiting on, for the status line.
    pub pending: Option<&'static str>,
    /// Whether to quit.
    pub should_quit: bool,
}

impl<W: WalletProvider, I: IndexerClient> App<W, I> {
    pub fn new(
        session: Arc<ContractSession<W, I>>,
        commands: UnboundedSender<SessionCommand>,
        events: UnboundedReceiver<SessionEvent>,
    ) -> Self {
        Self {
            session,
            commands,
            events,
            countdown: CountdownDriver::default(),
            mode: InputMode::Normal,
            notices: Vec::new(),
            pending: None,
            should_quit: false,
        }
    }

    /// Drain worker events and fold them into the notice log.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Connected => {
                    self.pending = None;
                    self.push_notice("Session connected".to_string());
                }
                SessionEvent::Refreshed => {
                    self.pending = None;
                }
                SessionEvent::Finalized { operation, tx_id } => {
                    self.pending = None;
                    self.push_notice(format!("{} finalized in {}", operation, tx_id));
                }
                SessionEvent::Failed { operation, message } => {
                    self.pending = None;
                    self.push_notice(format!("{} failed: {}", operation, message));
                }
            }
        }
    }

    /// Re-observe session state; called every frame after draining events.
    pub fn observe_session(&mut self) {
        let ledger = self.session.ledger();
        self.countdown.observe(self.session.status(), ledger.as_ref());
    }

    /// One-second tick: advance the countdown, firing execute at zero.
    pub fn on_tick(&mut self) {
        if self.countdown.tick() {
            self.push_notice("Countdown expired, executing inheritance".to_string());
            self.send(SessionCommand::Execute, "execute");
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match &mut self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Register(_) => self.handle_form_key(key, modifiers),
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        let ledger = self.session.ledger();
        let connected = self.session.status() == SessionStatus::Connected;
        let registered = ledger.as_ref().is_some_and(|l| l.is_registered);
        let executed = ledger.as_ref().is_some_and(|l| l.is_executed);

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => self.send(SessionCommand::Connect, "connect"),
            KeyCode::Char('f') => self.send(SessionCommand::Refresh, "refresh"),
            KeyCode::Char('r') if connected && !registered => {
                self.mode = InputMode::Register(RegisterForm::new());
            }
            KeyCode::Char('e') if connected && registered && !executed => {
                self.countdown.cancel();
                self.send(SessionCommand::Execute, "execute");
            }
            KeyCode::Char('x') => {
                if self.countdown.cancel() {
                    self.push_notice("Auto-execute countdown cancelled".to_string());
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let InputMode::Register(form) = &mut self.mode else {
            return;
        };
        match key {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
            KeyCode::Enter => {
                let parent = form.parent.value().trim().to_string();
                let child = form.child.value().trim().to_string();
                if parent.is_empty() || child.is_empty() {
                    self.push_notice("Both addresses are required".to_string());
                    return;
                }
                self.mode = InputMode::Normal;
                self.send(SessionCommand::Register { parent, child }, "register");
            }
            _ => {
                let event = crossterm::event::Event::Key(crossterm::event::KeyEvent::new(
                    key, modifiers,
                ));
                match form.focus {
                    Some(FormFocus::Child) => {
                        form.child.handle_event(&event);
                    }
                    _ => {
                        form.parent.handle_event(&event);
                    }
                }
            }
        }
    }

    fn send(&mut self, command: SessionCommand, label: &'static str) {
        self.pending = Some(label);
        if self.commands.send(command).is_err() {
            self.push_notice("Session worker is gone; restart the dashboard".to_string());
            self.pending = None;
        }
    }

    fn push_notice(&mut self, notice: String) {
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }
}
