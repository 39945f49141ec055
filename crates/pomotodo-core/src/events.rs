use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::Task;
use crate::timer::{Phase, SessionConfig, SessionState};

/// Every state change in the system produces an Event.
/// The UI renders from them; persistence, notification and the
/// session/task bridge subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    /// A focus phase counted down to zero.
    WorkPhaseComplete {
        completed_pomodoro_count: u32,
        work_duration: u32,
        at: DateTime<Utc>,
    },
    /// A break counted down to zero.
    BreakPhaseComplete {
        break_duration: u32,
        at: DateTime<Utc>,
    },
    /// The current phase was rewound to its full duration.
    PhaseReset {
        phase: Phase,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    /// Pomodoro count cleared and the session returned to a fresh focus phase.
    SessionReset {
        at: DateTime<Utc>,
    },
    /// Full session state after any change, including countdown progress.
    StateSnapshot {
        state: SessionState,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        config: SessionConfig,
        at: DateTime<Utc>,
    },
    TaskListsChanged {
        backlog: Vec<Task>,
        active: Vec<Task>,
        completed: Vec<Task>,
    },
}

/// Handle returned by `subscribe`, used to detach a listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Event)>;

/// Ordered set of event listeners.
///
/// Listeners run synchronously on the dispatching thread, in subscription
/// order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &Event) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
