//! Session state machine.
//!
//! [`transition`] is a pure function of the current [`Session`], an input
//! and the current time. It returns the next session plus the effects the
//! driver must carry out (events to publish, poll loops to start or cancel).
//!
//! ## States
//!
//! ```text
//!          ToggleRun                    countdown hits 0
//!   Work×Paused <──> Work×Running ───────────────────────> Break×(Running|Paused)
//!        ^                                                        |
//!        +────────── countdown hits 0 (auto-chain → Running) ─────+
//! ```
//!
//! ## Countdown
//!
//! Entering Running records an anchor `(t0, expected)`. Every tick computes
//! `remaining = max(0, expected - (now - t0))`, so irregular or skipped
//! ticks never accumulate drift. Completion is signalled once per anchor.
//! An auto-chained phase is anchored at the instant the previous one hit
//! zero, not at the poll that noticed it, so late polls cost no time.
//! At most one phase transition happens per tick; a phase that is already
//! over when it is entered completes on the following tick.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use super::settings::SettingEdit;
use super::{Phase, SessionConfig, SessionState};
use crate::clock::elapsed_secs;
use crate::events::Event;

/// Identifies one poll loop. A fresh handle is issued on every entry into
/// Running; polls carrying any other handle are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollHandle(u64);

impl PollHandle {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    started_at: DateTime<Utc>,
    expected_secs: f64,
    poll: PollHandle,
    completion_signaled: bool,
}

impl Anchor {
    /// The instant this countdown reaches zero.
    fn ends_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::milliseconds((self.expected_secs * 1000.0).round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// Re-evaluate the countdown against the clock.
    Tick,
    ToggleRun,
    /// Rewind the current phase to its configured duration and pause.
    ResetCurrentPhase,
    /// Clear the pomodoro count and return to a paused focus phase.
    ResetSession,
    SetWorkDuration(NonZeroU32),
    SetBreakDuration(NonZeroU32),
    SetTargetPomodoroCount(NonZeroU32),
    SetAutoChain(bool),
    /// The host is going away: freeze and stop polling.
    Teardown,
}

impl From<SettingEdit> for SessionInput {
    fn from(edit: SettingEdit) -> Self {
        match edit {
            SettingEdit::WorkDuration(d) => SessionInput::SetWorkDuration(d),
            SettingEdit::BreakDuration(d) => SessionInput::SetBreakDuration(d),
            SettingEdit::TargetPomodoroCount(n) => SessionInput::SetTargetPomodoroCount(n),
            SettingEdit::AutoChain(on) => SessionInput::SetAutoChain(on),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Emit(Event),
    StartPoll(PollHandle),
    CancelPoll(PollHandle),
}

/// Everything the state machine owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    anchor: Option<Anchor>,
    next_poll: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::restore(config, SessionState::initial(&config))
    }

    /// Resume from a persisted state. Always comes back paused.
    pub fn restore(config: SessionConfig, state: SessionState) -> Self {
        Self {
            config,
            state: state.restored(&config),
            anchor: None,
            next_poll: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Poll handle of the current run, if running.
    pub fn active_poll(&self) -> Option<PollHandle> {
        self.anchor.map(|anchor| anchor.poll)
    }
}

/// Compute the next session and the effects of applying `input` at `now`.
pub fn transition(session: &Session, input: SessionInput, now: DateTime<Utc>) -> (Session, Vec<Effect>) {
    let mut step = Step {
        next: session.clone(),
        effects: Vec::new(),
        now,
    };

    match input {
        SessionInput::Tick => step.tick(),
        SessionInput::ToggleRun => {
            if step.next.state.running {
                step.pause();
            } else {
                step.start();
            }
        }
        SessionInput::ResetCurrentPhase => step.reset_current_phase(),
        SessionInput::ResetSession => step.reset_session(),
        SessionInput::SetWorkDuration(d) => step.set_duration(Phase::Work, d.get()),
        SessionInput::SetBreakDuration(d) => step.set_duration(Phase::Break, d.get()),
        SessionInput::SetTargetPomodoroCount(n) => {
            step.next.config.target_pomodoro_count = n.get();
        }
        SessionInput::SetAutoChain(on) => step.next.config.auto_chain = on,
        SessionInput::Teardown => {
            if step.next.state.running {
                step.pause();
            }
        }
    }

    step.finish(session)
}

struct Step {
    next: Session,
    effects: Vec<Effect>,
    now: DateTime<Utc>,
}

impl Step {
    fn emit(&mut self, event: Event) {
        self.effects.push(Effect::Emit(event));
    }

    fn tick(&mut self) {
        let Some(mut anchor) = self.next.anchor else {
            return;
        };
        if !self.next.state.running {
            return;
        }

        let elapsed = elapsed_secs(anchor.started_at, self.now);
        let remaining = (anchor.expected_secs - elapsed).max(0.0);
        self.next.state.remaining_secs = remaining;

        if remaining > 0.0 || anchor.completion_signaled {
            return;
        }
        anchor.completion_signaled = true;
        self.next.anchor = Some(anchor);
        self.complete_phase(anchor.ends_at());
    }

    /// `ended_at` is when the countdown actually hit zero, which may be
    /// well before `self.now` if polls were late.
    fn complete_phase(&mut self, ended_at: DateTime<Utc>) {
        let finished = self.next.state.phase;
        let counted = self.next.state.phase_duration;

        match finished {
            Phase::Work => {
                self.next.state.completed_pomodoro_count += 1;
                let count = self.next.state.completed_pomodoro_count;
                tracing::info!(count, "work phase complete");
                self.emit(Event::WorkPhaseComplete {
                    completed_pomodoro_count: count,
                    work_duration: counted,
                    at: ended_at,
                });
            }
            Phase::Break => {
                tracing::info!("break phase complete");
                self.emit(Event::BreakPhaseComplete {
                    break_duration: counted,
                    at: ended_at,
                });
            }
        }

        self.enter_phase(finished.next());

        let target_reached = finished == Phase::Break
            && self.next.state.completed_pomodoro_count == self.next.config.target_pomodoro_count;
        if target_reached {
            tracing::info!(
                target = self.next.config.target_pomodoro_count,
                "pomodoro target reached; auto-chain disabled"
            );
            self.next.config.auto_chain = false;
        }

        if self.next.config.auto_chain {
            self.stop_poll();
            self.anchor_at(ended_at);
            let elapsed = elapsed_secs(ended_at, self.now);
            let remaining = (self.next.state.remaining_secs - elapsed).max(0.0);
            self.next.state.remaining_secs = remaining;
        } else {
            self.stop();
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        let duration = self.next.config.duration_of(phase);
        self.next.state.phase = phase;
        self.next.state.phase_duration = duration;
        self.next.state.remaining_secs = f64::from(duration);
    }

    fn start(&mut self) {
        self.anchor_now();
        self.emit(Event::TimerStarted {
            phase: self.next.state.phase,
            remaining_secs: self.next.state.remaining_secs,
            at: self.now,
        });
    }

    /// Freeze at the last computed value.
    fn pause(&mut self) {
        self.stop();
        self.emit(Event::TimerPaused {
            phase: self.next.state.phase,
            remaining_secs: self.next.state.remaining_secs,
            at: self.now,
        });
    }

    fn reset_current_phase(&mut self) {
        self.stop();
        let phase = self.next.state.phase;
        self.enter_phase(phase);
        tracing::info!(%phase, "phase reset");
        self.emit(Event::PhaseReset {
            phase,
            remaining_secs: self.next.state.remaining_secs,
            at: self.now,
        });
    }

    fn reset_session(&mut self) {
        self.stop();
        self.next.state.completed_pomodoro_count = 0;
        self.enter_phase(Phase::Work);
        tracing::info!("session reset");
        self.emit(Event::SessionReset { at: self.now });
    }

    /// A paused engine picks the new duration up immediately if it applies
    /// to the current phase. A running countdown is left alone; the new
    /// value applies the next time that phase starts.
    fn set_duration(&mut self, phase: Phase, secs: u32) {
        match phase {
            Phase::Work => self.next.config.work_duration = secs,
            Phase::Break => self.next.config.break_duration = secs,
        }
        if self.next.state.phase == phase && !self.next.state.running {
            self.enter_phase(phase);
        }
    }

    fn anchor_now(&mut self) {
        self.anchor_at(self.now);
    }

    /// Anchor the current `remaining` as the countdown starting at `started_at`.
    fn anchor_at(&mut self, started_at: DateTime<Utc>) {
        let poll = PollHandle(self.next.next_poll);
        self.next.next_poll += 1;
        self.next.anchor = Some(Anchor {
            started_at,
            expected_secs: self.next.state.remaining_secs,
            poll,
            completion_signaled: false,
        });
        self.next.state.running = true;
        self.effects.push(Effect::StartPoll(poll));
    }

    fn stop_poll(&mut self) {
        if let Some(anchor) = self.next.anchor.take() {
            self.effects.push(Effect::CancelPoll(anchor.poll));
        }
    }

    fn stop(&mut self) {
        self.stop_poll();
        self.next.state.running = false;
    }

    fn finish(mut self, previous: &Session) -> (Session, Vec<Effect>) {
        if self.next.config != previous.config {
            self.emit(Event::SettingsChanged {
                config: self.next.config,
                at: self.now,
            });
        }
        if self.next.state != previous.state {
            self.emit(Event::StateSnapshot {
                state: self.next.state,
                at: self.now,
            });
        }
        (self.next, self.effects)
    }
}
