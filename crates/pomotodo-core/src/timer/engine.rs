//! Session engine.
//!
//! Drives the pure state machine in [`super::machine`] with a [`Clock`],
//! tracks which poll loop is live, and publishes events to subscribers.
//! It does not use internal threads - the host polls it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(SessionConfig::default(), SystemClock);
//! engine.toggle_run();
//! // Every ~100ms while running:
//! if let Some(handle) = engine.active_poll() {
//!     engine.poll(handle);
//! }
//! ```

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::{Event, ListenerId, Listeners};

use super::machine::{transition, Effect, PollHandle, Session, SessionInput};
use super::settings::{Setting, SettingEdit};
use super::{SessionConfig, SessionState};

#[derive(Debug)]
pub struct SessionEngine<C: Clock> {
    clock: C,
    session: Session,
    active_poll: Option<PollHandle>,
    listeners: Listeners,
}

impl<C: Clock> SessionEngine<C> {
    /// Fresh engine, paused at the start of a focus phase.
    pub fn new(config: SessionConfig, clock: C) -> Self {
        Self::from_session(Session::new(config), clock)
    }

    /// Engine resumed from a persisted state. Always starts paused.
    pub fn restore(config: SessionConfig, state: SessionState, clock: C) -> Self {
        Self::from_session(Session::restore(config, state), clock)
    }

    fn from_session(session: Session, clock: C) -> Self {
        Self {
            clock,
            session,
            active_poll: None,
            listeners: Listeners::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn config(&self) -> &SessionConfig {
        self.session.config()
    }

    pub fn is_running(&self) -> bool {
        self.session.state().running
    }

    /// Handle of the poll loop the host should currently be running.
    pub fn active_poll(&self) -> Option<PollHandle> {
        self.active_poll
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one input and publish the resulting events.
    ///
    /// Poll cancellation happens before this returns.
    pub fn dispatch(&mut self, input: SessionInput) -> Vec<Event> {
        let now = self.clock.now();
        let (next, effects) = transition(&self.session, input, now);
        self.session = next;

        let mut events = Vec::new();
        for effect in effects {
            match effect {
                Effect::Emit(event) => events.push(event),
                Effect::StartPoll(handle) => self.active_poll = Some(handle),
                Effect::CancelPoll(handle) => {
                    if self.active_poll == Some(handle) {
                        self.active_poll = None;
                    }
                }
            }
        }
        debug_assert_eq!(self.active_poll, self.session.active_poll());

        for event in &events {
            self.listeners.emit(event);
        }
        events
    }

    /// Poll on behalf of the loop identified by `handle`.
    ///
    /// A handle from a loop that has since been cancelled is ignored, so a
    /// late timer callback can never mutate a stopped session.
    pub fn poll(&mut self, handle: PollHandle) -> Vec<Event> {
        if self.active_poll != Some(handle) {
            tracing::debug!(generation = handle.generation(), "stale poll ignored");
            return Vec::new();
        }
        self.dispatch(SessionInput::Tick)
    }

    /// Poll the live loop, if any.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.active_poll {
            Some(handle) => self.poll(handle),
            None => Vec::new(),
        }
    }

    pub fn toggle_run(&mut self) -> Vec<Event> {
        self.dispatch(SessionInput::ToggleRun)
    }

    pub fn reset_current_phase(&mut self) -> Vec<Event> {
        self.dispatch(SessionInput::ResetCurrentPhase)
    }

    pub fn reset_session(&mut self) -> Vec<Event> {
        self.dispatch(SessionInput::ResetSession)
    }

    /// Validate raw user text and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSettingValue`] for non-numeric or
    /// non-positive values; nothing is changed in that case.
    pub fn update_setting(&mut self, setting: Setting, raw: &str) -> Result<Vec<Event>, ValidationError> {
        let edit = SettingEdit::parse(setting, raw)?;
        Ok(self.apply_setting(edit))
    }

    pub fn apply_setting(&mut self, edit: SettingEdit) -> Vec<Event> {
        self.dispatch(edit.into())
    }

    /// Stop polling and freeze the countdown before the host goes away.
    pub fn teardown(&mut self) -> Vec<Event> {
        self.dispatch(SessionInput::Teardown)
    }
}
